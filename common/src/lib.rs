pub use eyre::Result;
use libloading::{library_filename, Library};
use std::{ffi::OsStr, fmt::Debug, ops::Deref, path::PathBuf, sync::Arc};

mod counters;
mod kv;

pub use counters::Counters;
pub use kv::{combine, format_kv, partition, reduce_groups, KeyValue};

pub trait App: Debug + Send + Sync {
    fn map(&self, k: String, v: String, counters: &Counters) -> Vec<KeyValue>;
    fn reduce(&self, k: String, vs: Vec<String>) -> Result<String>;

    /// Whether `reduce` may also run over partial groups on the map side.
    /// Requires an associative, commutative reduction whose output is a valid
    /// input value.
    fn combines(&self) -> bool {
        false
    }
}

/// Side inputs handed to an app when it is built, before any task runs.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    pub cache_files: Vec<PathBuf>,
}

impl AppContext {
    pub fn new(cache_files: Vec<PathBuf>) -> Self {
        Self { cache_files }
    }
}

type BuildFn = fn(&AppContext) -> Result<Box<dyn App>>;

#[macro_export]
macro_rules! declare_app {
    ($constructor:expr) => {
        #[no_mangle]
        pub fn _build_app(
            ctx: &::common::AppContext,
        ) -> ::common::Result<Box<dyn ::common::App>> {
            let app = $constructor(ctx)?;
            Ok(Box::new(app))
        }
    };
}

/// An app built from a dynamic library. Handles cloned out of it must be
/// dropped before it.
pub struct LoadedApp {
    app: Arc<dyn App>,
    _lib: Library,
}

impl LoadedApp {
    pub fn app(&self) -> Arc<dyn App> {
        Arc::clone(&self.app)
    }
}

impl Deref for LoadedApp {
    type Target = Arc<dyn App>;

    fn deref(&self) -> &Self::Target {
        &self.app
    }
}

pub fn load_app(name: impl AsRef<OsStr>, ctx: &AppContext) -> Result<LoadedApp> {
    let (lib, app) = unsafe {
        let lib = Library::new(library_filename(name))?;
        let app = {
            let build_fn = lib.get::<BuildFn>(b"_build_app\0")?;
            build_fn(ctx)?
        };
        (lib, app)
    };
    Ok(LoadedApp {
        app: Arc::from(app),
        _lib: lib,
    })
}

pub fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init()
}
