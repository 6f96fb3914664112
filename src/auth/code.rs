use rand::Rng;

/// Generates a six-digit confirmation/reset code.
///
/// Short enough to be typed from an email, drawn from the thread-local CSPRNG.
/// Collisions within the outstanding-token population are negligible and the
/// store lookup simply fails for a code that was never issued.
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", n)
}
