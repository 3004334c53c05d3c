//! Mocks for CIS-2 entrypoints, shared by the contract test suites.
//!
//! Gated on the native target rather than `cfg(test)` so that dependent
//! crates can reach the helpers from their own test modules.

#[cfg(not(target_arch = "wasm32"))]
pub use inner::*;

#[cfg(not(target_arch = "wasm32"))]
mod inner {
    use concordium_cis2::TransferParams;
    use concordium_std::test_infrastructure::MockFn;
    use concordium_std::*;

    use crate::{ContractTokenAmount, ContractTokenId};

    type TokenTransferParams = TransferParams<ContractTokenId, ContractTokenAmount>;

    /// Mock of a CIS-2 `transfer` entrypoint that parses the parameter and accepts.
    pub fn accept_transfer_mock<S>() -> MockFn<S> {
        MockFn::new(move |parameter, _amount, _balance, _state| {
            TokenTransferParams::deserial(&mut Cursor::new(parameter))
                .map_err(|_| CallContractError::Trap)?;
            Ok((false, Some(())))
        })
    }

    /// Mock of a CIS-2 `transfer` entrypoint that accepts only transfers passing `check`.
    pub fn check_transfer_mock<S>(
        check: impl Fn(&TokenTransferParams) -> bool + 'static,
    ) -> MockFn<S> {
        MockFn::new(move |parameter, _amount, _balance, _state| {
            let params = TokenTransferParams::deserial(&mut Cursor::new(parameter))
                .map_err(|_| CallContractError::Trap)?;
            if !check(&params) {
                return Err(CallContractError::Trap);
            }
            Ok((false, Some(())))
        })
    }

    /// Mock of a CIS-2 `transfer` entrypoint that rejects every transfer.
    pub fn reject_transfer_mock<S>() -> MockFn<S> {
        check_transfer_mock(|_| false)
    }
}
