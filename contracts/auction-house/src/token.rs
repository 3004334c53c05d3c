use commons::{ContractError, ContractResult, ContractTokenAmount, CustomContractError, Token};
use concordium_cis2::{AdditionalData, Receiver, Transfer, TransferParams};
use concordium_std::*;

/// Invoke the CIS-2 `transfer` entrypoint of the token's contract.
pub fn transfer<T>(
    host: &mut impl HasHost<T>,
    token: &Token,
    amount: ContractTokenAmount,
    from: Address,
    to: AccountAddress,
) -> ContractResult<()> {
    let parameter = TransferParams(vec![Transfer {
        token_id: token.id.clone(),
        amount,
        from,
        to: Receiver::Account(to),
        data: AdditionalData::empty(),
    }]);

    host.invoke_contract(
        &token.contract,
        &parameter,
        EntrypointName::new_unchecked("transfer"),
        Amount::zero(),
    )
    .map_err(handle_call_error)?;

    Ok(())
}

fn handle_call_error<R>(error: CallContractError<R>) -> ContractError {
    match error {
        CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
            CustomContractError::Incompatible.into()
        }
        CallContractError::LogicReject { .. } => CustomContractError::InvokeContractError.into(),
        e => CustomContractError::from(e).into(),
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::*;
    use concordium_cis2::{TokenAmountU64, TokenIdVec};
    use concordium_std::test_infrastructure::*;

    const TOKEN_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const SELF_ADDRESS: ContractAddress = ContractAddress {
        index: 0,
        subindex: 0,
    };
    const USER: AccountAddress = AccountAddress([1; 32]);

    fn token() -> Token {
        Token {
            contract: TOKEN_CONTRACT,
            id: TokenIdVec(vec![7]),
        }
    }

    #[concordium_test]
    fn test_transfer_invokes_token_contract() {
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new((), state_builder);

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            check_transfer_mock(|params| {
                let transfer = &params.0[0];
                transfer.amount == TokenAmountU64(5)
                    && transfer.token_id == TokenIdVec(vec![7])
                    && matches!(transfer.to, Receiver::Account(account) if account == USER)
            }),
        );

        let result = transfer(
            &mut host,
            &token(),
            TokenAmountU64(5),
            Address::Contract(SELF_ADDRESS),
            USER,
        );

        claim_eq!(result, Ok(()));
    }

    #[concordium_test]
    fn test_transfer_maps_rejections() {
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new((), state_builder);

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            reject_transfer_mock(),
        );

        let result = transfer(
            &mut host,
            &token(),
            TokenAmountU64(5),
            Address::Contract(SELF_ADDRESS),
            USER,
        );

        claim_eq!(
            result,
            Err(CustomContractError::InvokeContractError.into())
        );
    }
}
