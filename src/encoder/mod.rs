pub mod envelope;
pub mod exit;
pub mod ows;

pub use envelope::ServerProtocol;
pub use exit::{DesktopProtocol, ExitStatus};
