use crate::CustomContractError;
use concordium_std::*;

/// Addresses that are allowed to administer a contract instance.
///
/// The instance origin becomes the first admin. Admins may delegate their
/// rights to further addresses or revoke them again.
#[derive(Debug, Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct Authority<S: HasStateApi> {
    admins: StateSet<Address, S>,
}

impl<S: HasStateApi> Authority<S> {
    pub fn new(state_builder: &mut StateBuilder<S>, admin: Address) -> Self {
        let mut admins = state_builder.new_set();
        admins.insert(admin);
        Self { admins }
    }

    pub fn has_admin_rights(&self, address: &Address) -> bool {
        self.admins.contains(address)
    }

    /// Apply an update to the admin set. The sender must hold admin rights.
    pub fn handle_update(
        &mut self,
        sender: Address,
        update: AuthorityUpdateParams,
    ) -> Result<(), Reject> {
        ensure!(
            self.has_admin_rights(&sender),
            CustomContractError::Unauthorized.into()
        );

        match update.kind {
            AuthorityUpdateKind::Remove => {
                self.admins.remove(&update.address);
            }
            AuthorityUpdateKind::Add => {
                self.admins.insert(update.address);
            }
        }

        Ok(())
    }

    pub fn handle_view(&self, view: AuthorityViewParams) -> Vec<Address> {
        self.admins
            .iter()
            .skip(view.skip as usize)
            .take(view.show as usize)
            .map(|a| *a)
            .collect()
    }
}

#[derive(Debug, SchemaType, Serialize)]
pub enum AuthorityUpdateKind {
    Remove,
    Add,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct AuthorityUpdateParams {
    pub kind: AuthorityUpdateKind,
    pub address: Address,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct AuthorityViewParams {
    pub skip: u32,
    pub show: u32,
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const USER_1: AccountAddress = AccountAddress([16; 32]);
    const USER_2: AccountAddress = AccountAddress([17; 32]);

    fn default_authority() -> Authority<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        Authority::new(&mut state_builder, Address::Account(ADMIN))
    }

    #[concordium_test]
    fn test_origin_has_admin_rights() {
        let authority = default_authority();

        claim!(authority.has_admin_rights(&Address::Account(ADMIN)));
        claim!(!authority.has_admin_rights(&Address::Account(USER_1)));
    }

    #[concordium_test]
    fn test_admin_delegates_and_revokes() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(ADMIN),
            AuthorityUpdateParams {
                kind: AuthorityUpdateKind::Add,
                address: Address::Account(USER_1),
            },
        );
        claim_eq!(result, Ok(()));
        claim!(authority.has_admin_rights(&Address::Account(USER_1)));

        // The delegate may revoke the original admin.
        let result = authority.handle_update(
            Address::Account(USER_1),
            AuthorityUpdateParams {
                kind: AuthorityUpdateKind::Remove,
                address: Address::Account(ADMIN),
            },
        );
        claim_eq!(result, Ok(()));
        claim!(!authority.has_admin_rights(&Address::Account(ADMIN)));
    }

    #[concordium_test]
    fn test_non_admin_update_rejected() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(USER_1),
            AuthorityUpdateParams {
                kind: AuthorityUpdateKind::Add,
                address: Address::Account(USER_2),
            },
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
        claim!(!authority.has_admin_rights(&Address::Account(USER_2)));
    }

    #[concordium_test]
    fn test_view_pagination() {
        let mut authority = default_authority();
        for n in 16u8..32 {
            authority.admins.insert(Address::Account(AccountAddress([n; 32])));
        }

        let mut seen = 0;
        loop {
            let page = authority.handle_view(AuthorityViewParams { skip: seen, show: 5 });
            seen += page.len() as u32;
            if page.len() < 5 {
                break;
            }
        }

        // 16 inserted plus the origin admin.
        claim_eq!(seen, 17);
    }
}
