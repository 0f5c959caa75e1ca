use pardiff_common::{Entry, EntryPair};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;

/// Match the immediate children of two directories by name.
///
/// Every entry of both listings lands in exactly one returned pair. Left
/// entries come first in listing order, followed by the unmatched right
/// entries in listing order.
pub fn reconcile(
    left_dir: &Path,
    left: &[Entry],
    right_dir: &Path,
    right: &[Entry],
) -> Vec<EntryPair> {
    // name -> (is_dir, visited)
    let mut right_map: HashMap<&OsStr, (bool, bool)> = right
        .iter()
        .map(|entry| (entry.name.as_os_str(), (entry.is_dir, false)))
        .collect();

    let mut pairs = Vec::with_capacity(left.len() + right.len());

    for entry in left {
        let name = entry.name.as_os_str();
        let Some((right_is_dir, visited)) = right_map.get_mut(name) else {
            pairs.push(EntryPair::OnlyInLeft(entry.name.clone()));
            continue;
        };

        // A matched name is accounted for even when the kinds disagree.
        *visited = true;

        let left_path = left_dir.join(name);
        let right_path = right_dir.join(name);

        let pair = match (entry.is_dir, *right_is_dir) {
            (false, false) => EntryPair::BothFiles(left_path, right_path),
            (true, true) => EntryPair::BothDirectories(left_path, right_path),
            (true, false) => EntryPair::LeftDirRightFile(left_path, right_path),
            (false, true) => EntryPair::LeftFileRightDir(left_path, right_path),
        };
        pairs.push(pair);
    }

    for entry in right {
        let visited = right_map
            .get(entry.name.as_os_str())
            .map_or(false, |(_, visited)| *visited);
        if !visited {
            pairs.push(EntryPair::OnlyInRight(entry.name.clone()));
        }
    }

    pairs
}
