/*!
    PlayReady key material operations.

    - AES-128-ECB (no padding, single block): key checksum
    - SHA-256 folding: content key derivation from a key seed
*/

mod aes;
mod key_seed;

pub use self::aes::key_checksum;
pub use self::key_seed::KeySeed;
