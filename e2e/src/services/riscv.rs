use huobi_common::{
    config::RISCV_SERVICE,
    crypto::Address,
    service::riscv::{AddressList, DeployPayload, DeployResp, ExecPayload, GetContractPayload, GetContractResp},
};

use super::{read, write, ReadOutcome, WriteOutcome};
use crate::transaction::{CallError, ServiceCaller};

#[derive(Clone)]
pub struct RiscvService {
    caller: ServiceCaller,
}

fn exec_payload(address: &Address, args: &str) -> ExecPayload {
    ExecPayload {
        address: address.clone(),
        args: args.to_string(),
    }
}

impl RiscvService {
    pub fn new(caller: ServiceCaller) -> Self {
        Self { caller }
    }

    pub fn caller(&self) -> &ServiceCaller {
        &self.caller
    }

    /// Deploy a binary contract, `init_args` are passed to its entry point
    pub async fn deploy(&self, code: &[u8], init_args: &str) -> Result<WriteOutcome<DeployResp>, CallError> {
        self.deploy_payload(&DeployPayload::binary(code, init_args)).await
    }

    pub async fn deploy_payload(&self, payload: &DeployPayload) -> Result<WriteOutcome<DeployResp>, CallError> {
        write(&self.caller, RISCV_SERVICE, "deploy", payload).await
    }

    /// Read-only contract invocation
    pub async fn call(&self, address: &Address, args: &str) -> Result<ReadOutcome<String>, CallError> {
        read(&self.caller, RISCV_SERVICE, "call", &exec_payload(address, args)).await
    }

    pub async fn exec(&self, address: &Address, args: &str) -> Result<WriteOutcome<String>, CallError> {
        write(&self.caller, RISCV_SERVICE, "exec", &exec_payload(address, args)).await
    }

    pub async fn grant_deploy_auth(&self, addresses: Vec<Address>) -> Result<WriteOutcome<()>, CallError> {
        let payload = AddressList { addresses };
        write(&self.caller, RISCV_SERVICE, "grant_deploy_auth", &payload).await
    }

    pub async fn revoke_deploy_auth(&self, addresses: Vec<Address>) -> Result<WriteOutcome<()>, CallError> {
        let payload = AddressList { addresses };
        write(&self.caller, RISCV_SERVICE, "revoke_deploy_auth", &payload).await
    }

    /// Returns the subset of `addresses` allowed to deploy
    pub async fn check_deploy_auth(&self, addresses: Vec<Address>) -> Result<ReadOutcome<AddressList>, CallError> {
        let payload = AddressList { addresses };
        read(&self.caller, RISCV_SERVICE, "check_deploy_auth", &payload).await
    }

    pub async fn approve_contracts(&self, addresses: Vec<Address>) -> Result<WriteOutcome<()>, CallError> {
        let payload = AddressList { addresses };
        write(&self.caller, RISCV_SERVICE, "approve_contracts", &payload).await
    }

    pub async fn revoke_contracts(&self, addresses: Vec<Address>) -> Result<WriteOutcome<()>, CallError> {
        let payload = AddressList { addresses };
        write(&self.caller, RISCV_SERVICE, "revoke_contracts", &payload).await
    }

    pub async fn get_contract(
        &self,
        address: &Address,
        get_code: bool,
        storage_keys: Vec<String>,
    ) -> Result<ReadOutcome<GetContractResp>, CallError> {
        let payload = GetContractPayload {
            address: address.clone(),
            get_code,
            storage_keys,
        };
        read(&self.caller, RISCV_SERVICE, "get_contract", &payload).await
    }
}

#[cfg(test)]
mod tests {
    use huobi_common::{api::ServiceResponse, service::riscv::codes};

    use super::*;
    use crate::{client::mock::MockOutcome, services::test_utils::mock_caller};

    #[tokio::test]
    async fn test_deploy_returns_address() {
        let (chain, caller) = mock_caller();
        let service = RiscvService::new(caller);
        let contract = Address::new([0xc0; 20]);
        chain.push_outcome(MockOutcome::success(format!(
            r#"{{"address":"{}","init_ret":""}}"#,
            contract
        )));

        let outcome = service.deploy(b"\x7fELF", "set k init").await.unwrap();
        assert_eq!(outcome.data.unwrap().address, contract);

        let payload: serde_json::Value =
            serde_json::from_str(&chain.sent_transactions()[0].raw.request.payload).unwrap();
        assert_eq!(payload["code"], "7f454c46");
        assert_eq!(payload["intp_type"], "Binary");
    }

    #[tokio::test]
    async fn test_invalid_contract_code() {
        let (chain, caller) = mock_caller();
        let service = RiscvService::new(caller);
        chain.push_outcome(MockOutcome::failure(codes::INVALID_CONTRACT, "invalid contract"));

        let outcome = service.deploy(b"invalid contract", "invalid params").await.unwrap();
        assert_eq!(outcome.code, codes::INVALID_CONTRACT);
        assert!(outcome.data.is_none());
    }

    #[tokio::test]
    async fn test_call_and_check_deploy_auth() {
        let (chain, caller) = mock_caller();
        let service = RiscvService::new(caller.clone());
        let contract = Address::new([0xc0; 20]);
        chain.set_query_response(
            RISCV_SERVICE,
            "call",
            ServiceResponse {
                code: 0,
                succeed_data: "\"init\"".into(),
                error_message: String::new(),
            },
        );
        chain.set_query_response(
            RISCV_SERVICE,
            "check_deploy_auth",
            ServiceResponse {
                code: 0,
                succeed_data: format!(r#"{{"addresses":["{}"]}}"#, caller.address()),
                error_message: String::new(),
            },
        );

        let value = service.call(&contract, "get k").await.unwrap();
        assert_eq!(value.data.as_deref(), Some("init"));

        let auth = service
            .check_deploy_auth(vec![caller.address().clone()])
            .await
            .unwrap()
            .data
            .unwrap();
        assert!(auth.contains(caller.address()));
    }
}
