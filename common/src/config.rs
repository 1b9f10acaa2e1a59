use crate::crypto::Hash;

// Chain id used by the default single-node devnet genesis
pub const DEFAULT_CHAIN_ID: Hash = Hash::new([
    0xb6, 0xa4, 0xd7, 0xda, 0x21, 0x44, 0x3f, 0x5e, 0x81, 0x6e, 0x87, 0x00, 0xee, 0xa8, 0x76, 0x10,
    0xe6, 0xd7, 0x69, 0x65, 0x7d, 0x6b, 0x8e, 0xc7, 0x30, 0x28, 0x45, 0x7b, 0xf2, 0xca, 0x40, 0x36,
]);

// Native asset registered by the asset service genesis
pub const NATIVE_ASSET_ID: Hash = Hash::new([
    0xf5, 0x69, 0x24, 0xdb, 0x53, 0x8e, 0x77, 0xbb, 0x59, 0x51, 0xeb, 0x5f, 0xf0, 0xd0, 0x2b, 0x88,
    0x98, 0x3c, 0x49, 0xc4, 0x5e, 0xea, 0x30, 0xe8, 0xae, 0x3e, 0x72, 0x34, 0xb3, 0x11, 0x43, 0x6c,
]);

// Transaction composition defaults
pub const DEFAULT_CYCLES_LIMIT: u64 = 0xffff_ffff;
pub const DEFAULT_CYCLES_PRICE: u64 = 1;
// A transaction is valid until `latest_height + timeout_gap`
pub const DEFAULT_TIMEOUT_GAP: u64 = 20;

pub const GOVERNANCE_SERVICE: &str = "governance";
pub const ASSET_SERVICE: &str = "asset";
pub const KYC_SERVICE: &str = "kyc";
pub const NODE_MANAGER_SERVICE: &str = "node_manager";
pub const METADATA_SERVICE: &str = "metadata";
pub const RISCV_SERVICE: &str = "riscv";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_match_hex() {
        assert_eq!(
            DEFAULT_CHAIN_ID.to_hex(),
            "0xb6a4d7da21443f5e816e8700eea87610e6d769657d6b8ec73028457bf2ca4036"
        );
        assert_eq!(
            NATIVE_ASSET_ID.to_hex(),
            "0xf56924db538e77bb5951eb5ff0d02b88983c49c45eea30e8ae3e7234b311436c"
        );
    }
}
