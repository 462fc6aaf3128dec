//! 模拟密钥与运行 ID 生成
//!
//! 这里使用的是普通伪随机源（调用方传入 `rand::Rng`），不是密码学安全的随机数。
//! 生成的密钥只用于展示，从不参与加密；不要把它改成真正的密钥生成路径。
use rand::distr::Alphanumeric;
use rand::Rng;

/// 密钥长度（字符）
pub const KEY_LEN: usize = 32;
/// 勒索说明中展示的密钥前缀长度
pub const KEY_PREFIX_LEN: usize = 8;

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 32 位 [A-Za-z0-9] 随机串
pub fn generate_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..KEY_LEN).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// `GHOST-<YYYYmmddHHMMSS>-<8 位 [A-Z0-9]>`
pub fn generate_simulation_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let suffix: String = (0..8)
        .map(|_| char::from(ID_CHARSET[rng.random_range(0..ID_CHARSET.len())]))
        .collect();
    format!("GHOST-{stamp}-{suffix}")
}

/// 截断密钥用于展示：前 8 个字符加省略号
pub fn key_prefix(key: &str) -> String {
    let prefix: String = key.chars().take(KEY_PREFIX_LEN).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn key_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let key = generate_key(&mut rng);
        assert_eq!(key.len(), KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn simulation_id_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = generate_simulation_id(&mut rng);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "GHOST");
        assert_eq!(parts[1].len(), 14);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].bytes().all(|b| ID_CHARSET.contains(&b)));
    }

    #[test]
    fn prefix_truncates() {
        assert_eq!(key_prefix("abcdefghijklmnop"), "abcdefgh...");
        assert_eq!(key_prefix("abc"), "abc...");
    }
}
