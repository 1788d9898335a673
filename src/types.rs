/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the default config as bootstrap would write it.
    Gen,
    /// Print the path bootstrap writes to.
    Path,
    Get { key: String },
    List,
}
