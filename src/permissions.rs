//! Permission bitflags stored on `networks_users.permission`.

pub const VIEW_NETWORK: i64 = 1 << 0;
pub const PUBLISH_CONTENT: i64 = 1 << 1;
pub const MANAGE_TOKENS: i64 = 1 << 2;
pub const MANAGE_MEMBERS: i64 = 1 << 3;
pub const ADMINISTRATOR: i64 = 1 << 31;

pub const DEFAULT_MEMBER_PERMISSIONS: i64 = VIEW_NETWORK | PUBLISH_CONTENT;

/// Check a permission set for a specific bit. Administrators pass every check.
pub fn has(permissions: i64, required: i64) -> bool {
    if permissions & ADMINISTRATOR != 0 {
        return true;
    }
    permissions & required == required
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_members_can_view_and_publish() {
        assert!(has(DEFAULT_MEMBER_PERMISSIONS, VIEW_NETWORK));
        assert!(has(DEFAULT_MEMBER_PERMISSIONS, PUBLISH_CONTENT));
        assert!(!has(DEFAULT_MEMBER_PERMISSIONS, MANAGE_TOKENS));
    }

    #[test]
    fn administrator_passes_every_check() {
        assert!(has(ADMINISTRATOR, MANAGE_MEMBERS));
        assert!(has(ADMINISTRATOR, VIEW_NETWORK | MANAGE_TOKENS));
    }

    #[test]
    fn requires_all_bits() {
        assert!(!has(VIEW_NETWORK, VIEW_NETWORK | PUBLISH_CONTENT));
    }
}
