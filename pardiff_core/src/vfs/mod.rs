pub mod local;

#[cfg(test)]
mod tests_local;

pub use local::LocalVfs;
