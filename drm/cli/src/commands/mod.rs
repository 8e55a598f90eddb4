mod inspect_pssh;

pub mod playready;

pub use self::inspect_pssh::InspectPsshCommand;
pub use self::playready::PlayReadyCommand;
