use concordium_cis1::{AdditionalData, Receiver, TokenIdVec, Transfer};
use concordium_std::*;

use crate::errors::CustomContractError;
use crate::external::Token;

/// Parameter for the `operatorOf` query on the token contract.
#[derive(Debug, Serialize)]
pub struct OperatorOfParams {
    /// Token identifier the operator status is queried for.
    pub token_id: TokenIdVec,
    /// Address to check operator status of.
    pub address: Address,
}

/// Query the current owner of a token on the token contract.
pub fn owner_of<T>(host: &impl HasHost<T>, token: &Token) -> ReceiveResult<Address> {
    let mut response = host
        .invoke_contract_read_only(
            &token.contract,
            &token.id,
            EntrypointName::new_unchecked("ownerOf"),
            Amount::zero(),
        )
        .map_err(handle_query_error)?
        .ok_or(CustomContractError::Incompatible)?;

    Address::deserial(&mut response).map_err(|_| CustomContractError::Incompatible.into())
}

/// Query whether an address is an approved operator for a token on the token
/// contract.
pub fn is_operator_of<T>(
    host: &impl HasHost<T>,
    token: &Token,
    operator: &ContractAddress,
) -> ReceiveResult<bool> {
    let mut response = host
        .invoke_contract_read_only(
            &token.contract,
            &OperatorOfParams {
                token_id: token.id.clone(),
                address: Address::Contract(*operator),
            },
            EntrypointName::new_unchecked("operatorOf"),
            Amount::zero(),
        )
        .map_err(handle_query_error)?
        .ok_or(CustomContractError::Incompatible)?;

    bool::deserial(&mut response).map_err(|_| CustomContractError::Incompatible.into())
}

/// Transfer a token between accounts through the token contract. Relies on
/// this contract being an approved operator for the token.
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
    .map_err(handle_transfer_error)?;

    Ok(())
}

fn handle_query_error<R>(error: CallContractError<R>) -> Reject {
    match error {
        CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
            CustomContractError::Incompatible.into()
        }
        CallContractError::LogicReject { .. } => CustomContractError::InvokeContractError.into(),
        e => e.into(),
    }
}

fn handle_transfer_error<R>(error: CallContractError<R>) -> Reject {
    match error {
        CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
            CustomContractError::Incompatible.into()
        }
        _ => CustomContractError::TransferFailed.into(),
    }
}

#[concordium_cfg_test]
mod tests {
    use concordium_cis1::{TokenIdVec, TransferParams};
    use concordium_std::test_infrastructure::*;

    use super::*;

    const NFT_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };

    const USER_1: AccountAddress = AccountAddress([1; 32]);
    const USER_2: AccountAddress = AccountAddress([2; 32]);

    fn token() -> Token {
        Token {
            contract: NFT_CONTRACT,
            id: TokenIdVec(vec![0]),
        }
    }

    #[concordium_test]
    fn test_owner_of() {
        let state = ();
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new(state, state_builder);

        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("ownerOf".into()),
            MockFn::new_v1(|param, _, _, _| {
                TokenIdVec::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                Ok((false, Address::Account(USER_1)))
            }),
        );

        let response = owner_of(&host, &token());

        claim_eq!(response, Ok(Address::Account(USER_1)));
    }

    #[concordium_test]
    fn test_is_operator_of() {
        let state = ();
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new(state, state_builder);

        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("operatorOf".into()),
            MockFn::new_v1(|param, _, _, _| {
                let query = OperatorOfParams::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                Ok((false, query.address == Address::Contract(NFT_CONTRACT)))
            }),
        );

        let response = is_operator_of(&host, &token(), &NFT_CONTRACT);

        claim_eq!(response, Ok(true));
    }

    #[concordium_test]
    fn test_transfer() {
        let state = ();
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new(state, state_builder);

        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|param, _, _, _| {
                TransferParams::<TokenIdVec>::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                Ok((true, ()))
            }),
        );

        let response = transfer(&mut host, token(), USER_1, USER_2);

        claim_eq!(response, Ok(()));
    }

    #[concordium_test]
    fn test_transfer_failure() {
        let state = ();
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new(state, state_builder);

        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|_, _, _, _| -> Result<(bool, ()), CallContractError<()>> {
                Err(CallContractError::Trap)
            }),
        );

        let response = transfer(&mut host, token(), USER_1, USER_2);

        claim_eq!(response, Err(CustomContractError::TransferFailed.into()));
    }
}
