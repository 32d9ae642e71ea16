use error_stack::{Report, ResultExt};
use kernel::prelude::entity::{AdminAllowList, UserId};
use kernel::KernelError;
use std::net::SocketAddr;
use std::path::PathBuf;
use time::macros::{format_description, offset};
use time::UtcOffset;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_OFFSET: UtcOffset = offset!(+8);

#[derive(Debug, Clone)]
pub struct Settings {
    pub admins: AdminAllowList,
    pub display_offset: UtcOffset,
    pub bind: SocketAddr,
    pub catalog_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let admins = parse_admins(&var("ADMIN_UIDS").unwrap_or_default());
        let display_offset = var("DISPLAY_UTC_OFFSET")
            .map(|raw| parse_offset(&raw))
            .transpose()?
            .unwrap_or(DEFAULT_OFFSET);
        let bind = var("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse::<SocketAddr>()
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| "BIND_ADDRESS is not a socket address")?;
        let catalog_path = var("CATALOG_PATH").map(PathBuf::from);
        Ok(Self {
            admins,
            display_offset,
            bind,
            catalog_path,
        })
    }
}

fn var(key: &str) -> Option<String> {
    dotenvy::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_admins(raw: &str) -> AdminAllowList {
    AdminAllowList::new(
        raw.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(UserId::new),
    )
}

/// `+HH:MM` / `-HH:MM`.
fn parse_offset(raw: &str) -> Result<UtcOffset, Report<KernelError>> {
    let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(raw.trim(), &format)
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("DISPLAY_UTC_OFFSET {raw:?} is not of the form +HH:MM"))
}
