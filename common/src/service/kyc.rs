use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::crypto::Address;

pub mod codes {
    pub const BAD_PAYLOAD: u64 = 101;
    pub const SERDE: u64 = 102;
    pub const ORG_NOT_FOUND: u64 = 103;
    pub const NON_AUTHORIZED: u64 = 104;
    pub const ORG_ALREADY_EXISTS: u64 = 105;
    pub const OUT_OF_CYCLES: u64 = 106;
    pub const EXPRESSION: u64 = 107;
    pub const UNAPPROVED_ORG: u64 = 108;
}

/// Tag name to the list of values a user holds for it
pub type UserTags = BTreeMap<String, Vec<String>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterOrgPayload {
    pub name: String,
    pub description: String,
    pub admin: Address,
    pub supported_tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycOrgInfo {
    pub name: String,
    pub description: String,
    pub admin: Address,
    pub supported_tags: Vec<String>,
    pub approved: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOrgApprovedPayload {
    pub org_name: String,
    pub approved: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSupportedTagsPayload {
    pub org_name: String,
    pub supported_tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserTagsPayload {
    pub org_name: String,
    pub user: Address,
    pub tags: UserTags,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUserTagsPayload {
    pub org_name: String,
    pub user: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalUserTagExpressionPayload {
    pub user: Address,
    pub expression: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOrgAdminPayload {
    pub name: String,
    pub new_admin: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeServiceAdminPayload {
    pub new_admin: Address,
}

// Events. The service echoes most payloads back as the event body.

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrgEvent {
    pub name: String,
    pub supported_tags: Vec<String>,
}

pub type ChangeOrgApprovedEvent = ChangeOrgApprovedPayload;
pub type UpdateSupportedTagsEvent = UpdateSupportedTagsPayload;
pub type UpdateUserTagsEvent = UpdateUserTagsPayload;
pub type ChangeOrgAdminEvent = ChangeOrgAdminPayload;

/// Single-tag atom of an expression: org name, tag, then the value in backticks
pub fn tag_atom(org_name: &str, tag: &str, value: &str) -> String {
    format!("{}.{}@`{}`", org_name, tag, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_tags_payload_json() {
        let mut tags = UserTags::new();
        tags.insert("nation".to_string(), vec!["CN".to_string(), "US".to_string()]);
        let payload = UpdateUserTagsPayload {
            org_name: "Huobi".to_string(),
            user: Address::new([3; 20]),
            tags,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["tags"]["nation"][1], "US");
        assert_eq!(json["org_name"], "Huobi");
    }

    #[test]
    fn test_tag_atom() {
        assert_eq!(tag_atom("Huobi", "level", "A"), "Huobi.level@`A`");
    }
}
