//! Case file version migration.

use crate::ProjectError;
use crate::schema::Case;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut case: Case) -> Result<Case, ProjectError> {
    while case.version < LATEST_VERSION {
        case = migrate_one_version(case)?;
    }
    Ok(case)
}

fn migrate_one_version(case: Case) -> Result<Case, ProjectError> {
    match case.version {
        0 => migrate_v0_to_v1(case),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

// Unversioned drafts share the v1 layout.
fn migrate_v0_to_v1(mut case: Case) -> Result<Case, ProjectError> {
    case.version = 1;
    Ok(case)
}
