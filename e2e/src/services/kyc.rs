use huobi_common::{
    config::KYC_SERVICE,
    crypto::Address,
    service::kyc::{
        ChangeOrgAdminPayload, ChangeOrgApprovedPayload, ChangeServiceAdminPayload,
        EvalUserTagExpressionPayload, GetUserTagsPayload, KycOrgInfo, RegisterOrgPayload,
        UpdateSupportedTagsPayload, UpdateUserTagsPayload, UserTags,
    },
};

use super::{read, read_empty, write, ReadOutcome, WriteOutcome};
use crate::transaction::{CallError, ServiceCaller};

#[derive(Clone)]
pub struct KycService {
    caller: ServiceCaller,
}

impl KycService {
    pub fn new(caller: ServiceCaller) -> Self {
        Self { caller }
    }

    pub fn caller(&self) -> &ServiceCaller {
        &self.caller
    }

    pub async fn register_org(&self, payload: &RegisterOrgPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, KYC_SERVICE, "register_org", payload).await
    }

    // Org lookups take the bare name as a JSON string payload
    pub async fn get_org_info(&self, org_name: &str) -> Result<ReadOutcome<KycOrgInfo>, CallError> {
        read(&self.caller, KYC_SERVICE, "get_org_info", org_name).await
    }

    pub async fn get_orgs(&self) -> Result<ReadOutcome<Vec<String>>, CallError> {
        read_empty(&self.caller, KYC_SERVICE, "get_orgs").await
    }

    pub async fn get_org_supported_tags(&self, org_name: &str) -> Result<ReadOutcome<Vec<String>>, CallError> {
        read(&self.caller, KYC_SERVICE, "get_org_supported_tags", org_name).await
    }

    pub async fn change_org_approved(&self, org_name: &str, approved: bool) -> Result<WriteOutcome<()>, CallError> {
        let payload = ChangeOrgApprovedPayload {
            org_name: org_name.to_string(),
            approved,
        };
        write(&self.caller, KYC_SERVICE, "change_org_approved", &payload).await
    }

    pub async fn update_supported_tags(
        &self,
        org_name: &str,
        supported_tags: Vec<String>,
    ) -> Result<WriteOutcome<()>, CallError> {
        let payload = UpdateSupportedTagsPayload {
            org_name: org_name.to_string(),
            supported_tags,
        };
        write(&self.caller, KYC_SERVICE, "update_supported_tags", &payload).await
    }

    pub async fn update_user_tags(&self, payload: &UpdateUserTagsPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, KYC_SERVICE, "update_user_tags", payload).await
    }

    pub async fn get_user_tags(&self, org_name: &str, user: &Address) -> Result<ReadOutcome<UserTags>, CallError> {
        let payload = GetUserTagsPayload {
            org_name: org_name.to_string(),
            user: user.clone(),
        };
        read(&self.caller, KYC_SERVICE, "get_user_tags", &payload).await
    }

    pub async fn eval_user_tag_expression(
        &self,
        user: &Address,
        expression: &str,
    ) -> Result<ReadOutcome<bool>, CallError> {
        let payload = EvalUserTagExpressionPayload {
            user: user.clone(),
            expression: expression.to_string(),
        };
        read(&self.caller, KYC_SERVICE, "eval_user_tag_expression", &payload).await
    }

    pub async fn change_org_admin(&self, name: &str, new_admin: &Address) -> Result<WriteOutcome<()>, CallError> {
        let payload = ChangeOrgAdminPayload {
            name: name.to_string(),
            new_admin: new_admin.clone(),
        };
        write(&self.caller, KYC_SERVICE, "change_org_admin", &payload).await
    }

    pub async fn change_service_admin(&self, new_admin: &Address) -> Result<WriteOutcome<()>, CallError> {
        let payload = ChangeServiceAdminPayload {
            new_admin: new_admin.clone(),
        };
        write(&self.caller, KYC_SERVICE, "change_service_admin", &payload).await
    }
}
