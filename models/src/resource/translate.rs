use crate::error::model_error::ModelError;
use crate::{
    AccountAttributes, AccountObject, EntitlementAttributes, EntitlementObject, ErrorLocation,
    ObjectKey, RoleRecord, UserRecord,
};

use std::panic::Location;

const ACTIVE_STATUS: &str = "Active";
const ENTITLEMENT_TYPE: &str = "group";

impl TryFrom<UserRecord> for AccountObject {
    type Error = ModelError;

    #[track_caller]
    fn try_from(user: UserRecord) -> Result<Self, Self::Error> {
        let id = user
            .id
            .as_ref()
            .map(ToString::to_string)
            .ok_or_else(|| ModelError::Translation {
                message: String::from("User record has no id"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let disabled = user.status.as_ref().and_then(|status| status.as_str()) != Some(ACTIVE_STATUS);

        Ok(AccountObject {
            key: ObjectKey::simple(id.clone()),
            disabled,
            attributes: AccountAttributes {
                id,
                firstname: user.firstname,
                lastname: user.lastname,
                email: user.email,
                role: user.role,
                role_id: user.role_id,
                status: user.status,
                two_factor_enable: user.two_factor_enable,
                timezone: user.timezone,
                last_login_time: user.last_login_time,
            },
        })
    }
}

impl TryFrom<RoleRecord> for EntitlementObject {
    type Error = ModelError;

    #[track_caller]
    fn try_from(role: RoleRecord) -> Result<Self, Self::Error> {
        let role_id = role
            .role_id
            .as_ref()
            .map(ToString::to_string)
            .ok_or_else(|| ModelError::Translation {
                message: String::from("Role record has no roleId"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(EntitlementObject {
            key: ObjectKey::simple(role_id.clone()),
            entitlement_type: String::from(ENTITLEMENT_TYPE),
            attributes: EntitlementAttributes {
                role_id,
                label: role.label,
                organization_id: role.organization_id,
            },
        })
    }
}
