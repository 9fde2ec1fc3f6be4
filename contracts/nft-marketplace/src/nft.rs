use commons::{CustomContractError, Token};
use concordium_cis1::{AdditionalData, Receiver, Transfer};
use concordium_std::*;

use crate::external::ApprovalQueryParams;

/// Query the current owner of the token from its collection contract.
pub fn owner_of<T>(host: &impl HasHost<T>, token: &Token) -> ReceiveResult<AccountAddress> {
    let mut response = host
        .invoke_contract_read_only(
            &token.contract,
            &token.id,
            EntrypointName::new_unchecked("ownerOf"),
            Amount::zero(),
        )
        .map_err(handle_call_error)?
        .ok_or(CustomContractError::Incompatible)?;

    AccountAddress::deserial(&mut response).map_err(|_| CustomContractError::Incompatible.into())
}

/// Query whether `operator` is approved to transfer the token on the owner's
/// behalf.
pub fn is_approved<T>(
    host: &impl HasHost<T>,
    token: &Token,
    operator: &ContractAddress,
) -> ReceiveResult<bool> {
    let params = ApprovalQueryParams {
        id: token.id.clone(),
        operator: Address::Contract(*operator),
    };

    let mut response = host
        .invoke_contract_read_only(
            &token.contract,
            &params,
            EntrypointName::new_unchecked("isApproved"),
            Amount::zero(),
        )
        .map_err(handle_call_error)?
        .ok_or(CustomContractError::Incompatible)?;

    bool::deserial(&mut response).map_err(|_| CustomContractError::Incompatible.into())
}

/// Transfer one unit of the token between accounts through the collection
/// contract's CIS-1 transfer function.
pub fn transfer<T>(
    host: &mut impl HasHost<T>,
    token: Token,
    from: AccountAddress,
    to: AccountAddress,
) -> ReceiveResult<()> {
    host.invoke_contract(
        &token.contract,
        &(
            1u16,
            Transfer {
                token_id: token.id,
                amount: 1,
                from: Address::Account(from),
                to: Receiver::Account(to),
                data: AdditionalData::empty(),
            },
        ),
        EntrypointName::new_unchecked("transfer"),
        Amount::zero(),
    )
    .map_err(handle_call_error)?;

    Ok(())
}

fn handle_call_error<R>(error: CallContractError<R>) -> Reject {
    match error {
        CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
            CustomContractError::Incompatible.into()
        }
        CallContractError::LogicReject { .. } => CustomContractError::InvokeContractError.into(),
        e => e.into(),
    }
}

#[concordium_cfg_test]
mod tests {
    use concordium_cis1::{TokenIdVec, TransferParams};
    use concordium_std::test_infrastructure::*;

    use super::*;

    const COLLECTION: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const MARKETPLACE: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };

    const USER_1: AccountAddress = AccountAddress([1; 32]);
    const USER_2: AccountAddress = AccountAddress([2; 32]);

    fn test_token() -> Token {
        Token {
            contract: COLLECTION,
            id: TokenIdVec([1; 32].to_vec()),
        }
    }

    #[concordium_test]
    fn test_owner_of() {
        let state = ();
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new(state, state_builder);

        host.setup_mock_entrypoint(
            COLLECTION,
            OwnedEntrypointName::new_unchecked("ownerOf".into()),
            MockFn::new_v1(|param, _, _, _| {
                TokenIdVec::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                Ok((false, USER_1))
            }),
        );

        let response = owner_of(&host, &test_token());

        claim_eq!(response, Ok(USER_1))
    }

    #[concordium_test]
    fn test_is_approved() {
        let state = ();
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new(state, state_builder);

        host.setup_mock_entrypoint(
            COLLECTION,
            OwnedEntrypointName::new_unchecked("isApproved".into()),
            MockFn::new_v1(|param, _, _, _| {
                let query = ApprovalQueryParams::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                if query.operator != Address::Contract(MARKETPLACE) {
                    return Err(CallContractError::Trap);
                }
                Ok((false, true))
            }),
        );

        let response = is_approved(&host, &test_token(), &MARKETPLACE);

        claim_eq!(response, Ok(true))
    }

    #[concordium_test]
    fn test_transfer() {
        let state = ();
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new(state, state_builder);

        host.setup_mock_entrypoint(
            COLLECTION,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|param, _, _, _| {
                TransferParams::<TokenIdVec>::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                Ok((true, ()))
            }),
        );

        let response = transfer(&mut host, test_token(), USER_1, USER_2);

        claim_eq!(response, Ok(()))
    }
}
