pub mod extractor;

pub use extractor::CurrentUser;

/// Authentication state computed upstream of the login gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub bool);
