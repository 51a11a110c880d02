pub mod animate;
pub mod app;
pub mod console;
pub mod history;
pub mod prefs;
pub mod router;
pub mod scan;
pub mod terminal;
pub mod theme;

pub use router::Router;
pub use terminal::Session;
