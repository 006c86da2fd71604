mod defaults;
mod env;
mod file;
mod load;
mod paths;
mod types;
mod util;

pub use types::ScannerConfig;

#[cfg(test)]
pub(super) use util::split_csv;

#[cfg(test)]
mod tests;
