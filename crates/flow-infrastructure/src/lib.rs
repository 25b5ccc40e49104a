pub mod media;
pub mod paths;
pub mod session_store;
pub mod settings;
pub mod storage;

pub use media::probe_video;
pub use paths::FlowPaths;
pub use session_store::TomlSessionStore;
pub use settings::ClientSettings;
pub use storage::AtomicTomlFile;
