//! Generated mailbox credentials.
//!
//! Passwords are 16 characters with at least one lowercase letter, one
//! uppercase letter, one digit, and one special character, shuffled so the
//! guaranteed characters carry no positional bias. The thread-local generator
//! from `rand` is cryptographically secure and OS-seeded, which matters here:
//! the output becomes a live mailbox credential.

use rand::seq::SliceRandom;
use rand::Rng;

pub const PASSWORD_LEN: usize = 16;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%&*";

fn pick(rng: &mut impl Rng, class: &[u8]) -> u8 {
    class[rng.gen_range(0..class.len())]
}

/// Generates a random password satisfying the composition policy above.
/// Cannot fail; only consumes entropy.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();

    let mut chars = vec![
        pick(&mut rng, LOWERCASE),
        pick(&mut rng, UPPERCASE),
        pick(&mut rng, DIGITS),
        pick(&mut rng, SPECIAL),
    ];

    let pool: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS, SPECIAL].concat();
    for _ in chars.len()..PASSWORD_LEN {
        chars.push(pick(&mut rng, &pool));
    }

    chars.shuffle(&mut rng);

    String::from_utf8(chars).expect("password alphabet is ASCII")
}
