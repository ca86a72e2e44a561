//! Cast member use-case service.
//!
//! # Invariants
//! - Unknown type codes are reported as validation messages on field
//!   `type`, together with any name errors from the same request.

use crate::model::cast_member::{CastMember, CastMemberCreateCommand, CastMemberType};
use crate::model::id::CastMemberId;
use crate::model::validation::{validate_name, ValidationErrors};
use crate::repo::cast_member_repo::{
    CastMemberFilter, CastMemberRepository, CastMemberSearchParams,
};
use crate::repo::repository::{RepoError, Repository, SearchableRepository};
use crate::repo::search::SearchParamsInput;
use crate::service::{PaginationOutput, ServiceResult};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCastMemberInput {
    pub name: String,
    /// Role code: `1` director, `2` actor.
    pub member_type: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCastMemberInput {
    pub id: String,
    pub name: Option<String>,
    pub member_type: Option<i64>,
}

pub type ListCastMembersInput = SearchParamsInput<CastMemberFilter>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastMemberOutput {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&CastMember> for CastMemberOutput {
    fn from(entity: &CastMember) -> Self {
        Self {
            id: entity.cast_member_id().to_string(),
            name: entity.name().to_string(),
            member_type: entity.member_type().code(),
            created_at: entity.created_at(),
        }
    }
}

pub struct CastMemberService<R: CastMemberRepository> {
    repo: R,
}

impl<R: CastMemberRepository> CastMemberService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn create(&self, input: CreateCastMemberInput) -> ServiceResult<CastMemberOutput> {
        let cast_member = match CastMemberType::try_from_code(input.member_type) {
            Ok(member_type) => CastMember::create(CastMemberCreateCommand {
                name: input.name,
                member_type,
            })?,
            Err(type_err) => {
                let mut errors = ValidationErrors::new();
                validate_name(&input.name, &mut errors);
                errors.add("type", type_err.to_string());
                return Err(errors.into());
            }
        };
        self.repo.insert(&cast_member)?;

        info!(
            "event=cast_member_create module=service status=ok cast_member_id={}",
            cast_member.cast_member_id()
        );
        Ok(CastMemberOutput::from(&cast_member))
    }

    pub fn update(&self, input: UpdateCastMemberInput) -> ServiceResult<CastMemberOutput> {
        let cast_member_id = CastMemberId::parse(&input.id)?;
        let mut cast_member = self
            .repo
            .find_by_id(&cast_member_id)?
            .ok_or_else(|| RepoError::not_found::<CastMember>(&cast_member_id))?;

        let mut errors = ValidationErrors::new();
        if let Some(name) = input.name {
            if let Err(err) = cast_member.change_name(name) {
                errors.merge(err);
            }
        }
        if let Some(code) = input.member_type {
            match CastMemberType::try_from_code(code) {
                Ok(member_type) => cast_member.change_type(member_type),
                Err(err) => errors.add("type", err.to_string()),
            }
        }
        errors.into_result()?;

        self.repo.update(&cast_member)?;
        info!(
            "event=cast_member_update module=service status=ok cast_member_id={cast_member_id}"
        );
        Ok(CastMemberOutput::from(&cast_member))
    }

    pub fn get(&self, id: &str) -> ServiceResult<CastMemberOutput> {
        let cast_member_id = CastMemberId::parse(id)?;
        let cast_member = self
            .repo
            .find_by_id(&cast_member_id)?
            .ok_or_else(|| RepoError::not_found::<CastMember>(&cast_member_id))?;
        Ok(CastMemberOutput::from(&cast_member))
    }

    pub fn list(
        &self,
        input: ListCastMembersInput,
    ) -> ServiceResult<PaginationOutput<CastMemberOutput>> {
        let params = CastMemberSearchParams::from_input(input);
        let result = self.repo.search(&params)?;
        debug!(
            "event=cast_member_list module=service status=ok page={} per_page={} total={}",
            result.current_page(),
            result.per_page(),
            result.total()
        );
        Ok(PaginationOutput::from_result(result, |cast_member| {
            CastMemberOutput::from(&cast_member)
        }))
    }

    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let cast_member_id = CastMemberId::parse(id)?;
        self.repo.delete(&cast_member_id)?;
        info!(
            "event=cast_member_delete module=service status=ok cast_member_id={cast_member_id}"
        );
        Ok(())
    }
}
