/// Errors raised by [`ApiFixture`](super::ApiFixture).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum FixtureError {
    /// The shared token could not be created.
    ///
    /// The failure is cached: every later call reports the same message
    /// without trying to log in again.
    #[from(ignore)]
    #[display("Auth token unavailable: {message}")]
    TokenUnavailable {
        /// Why the token could not be created.
        message: String,
    },

    /// Writing a log attachment failed.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
}
