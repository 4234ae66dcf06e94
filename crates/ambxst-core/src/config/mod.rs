mod dock;
mod matcher;
mod paths;

pub use dock::{DockConfig, DockPosition};
pub use matcher::AppMatcher;
pub use paths::ConfigPaths;
pub(crate) use paths::expand_home;
