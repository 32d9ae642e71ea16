use kernel::prelude::entity::{DestructIdentity, Identity};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IdentityDto {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<Identity> for IdentityDto {
    fn from(value: Identity) -> Self {
        let DestructIdentity { id, name, email } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.map(String::from),
            email: email.map(String::from),
        }
    }
}
