use uuid::Uuid;

/// Length of codes generated when the caller does not pick one.
pub const GENERATED_CODE_LEN: usize = 6;

/// Random short code: the leading hex digits of a v4 UUID, lowercase.
///
/// Collisions are unlikely but possible; callers must still insert with a
/// set-if-absent check.
pub fn generate_code() -> String {
    let mut buf = Uuid::encode_buffer();
    let hex = Uuid::new_v4().simple().encode_lower(&mut buf);
    hex[..GENERATED_CODE_LEN].to_string()
}
