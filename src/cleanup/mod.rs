//! # Cleanup Module
//!
//! Removes files that older generator versions wrote and the current one no
//! longer produces. Runs before anything is materialized.
//!
//! The rules are one ordered table of `(threshold, action)` pairs. A rule
//! fires when the version recorded by the previous run is strictly below its
//! threshold; with no recorded version every rule fires.


use crate::catalog::Predicate;
use crate::config::GenerationContext;
use crate::error::{GeneratorError, Result};
use semver::Version;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves the path a rule removes, relative to the project root.
pub type TargetFn = Arc<dyn Fn(&GenerationContext) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupAction {
    RemoveFile,
    RemoveFolder,
}

/// One obsolete path, tied to the version that stopped generating it.
#[derive(Clone)]
pub struct CleanupRule {
    threshold: Version,
    action: CleanupAction,
    target: TargetFn,
    condition: Option<Predicate>,
}

impl CleanupRule {
    pub fn new<F>(threshold: &str, action: CleanupAction, target: F) -> Result<Self>
    where
        F: Fn(&GenerationContext) -> String + Send + Sync + 'static,
    {
        Ok(Self {
            threshold: parse_version(threshold)?,
            action,
            target: Arc::new(target),
            condition: None,
        })
    }

    pub fn remove_file<F>(threshold: &str, target: F) -> Result<Self>
    where
        F: Fn(&GenerationContext) -> String + Send + Sync + 'static,
    {
        Self::new(threshold, CleanupAction::RemoveFile, target)
    }

    pub fn remove_folder<F>(threshold: &str, target: F) -> Result<Self>
    where
        F: Fn(&GenerationContext) -> String + Send + Sync + 'static,
    {
        Self::new(threshold, CleanupAction::RemoveFolder, target)
    }

    /// Only apply the rule when `f` holds.
    pub fn when<F>(mut self, f: F) -> Self
    where
        F: Fn(&GenerationContext) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(f));
        self
    }

    pub fn threshold(&self) -> &Version {
        &self.threshold
    }

    pub fn action(&self) -> CleanupAction {
        self.action
    }

    fn applies(&self, old_version: Option<&Version>, ctx: &GenerationContext) -> bool {
        old_version.map_or(true, |old| old < &self.threshold)
            && self.condition.as_ref().map_or(true, |condition| condition(ctx))
    }
}

impl fmt::Debug for CleanupRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupRule")
            .field("threshold", &self.threshold.to_string())
            .field("action", &self.action)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

/// A path selected for removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRemoval {
    pub threshold: Version,
    pub action: CleanupAction,
    /// Relative to the project root
    pub path: PathBuf,
}

/// What [`CleanupPlan::apply`] did with one planned removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub path: PathBuf,
    pub action: CleanupAction,
    /// False when the path was already absent
    pub removed: bool,
}

/// Ordered rule table.
#[derive(Debug, Clone, Default)]
pub struct CleanupPlan {
    rules: Vec<CleanupRule>,
}

impl CleanupPlan {
    /// Rules are ordered by threshold; rules sharing a threshold keep their
    /// relative order.
    pub fn new(mut rules: Vec<CleanupRule>) -> Self {
        rules.sort_by(|a, b| a.threshold.cmp(&b.threshold));
        Self { rules }
    }

    pub fn rules(&self) -> &[CleanupRule] {
        &self.rules
    }

    /// Removals that would apply for `old_version`, without touching disk.
    pub fn plan(&self, old_version: Option<&str>, ctx: &GenerationContext) -> Result<Vec<PlannedRemoval>> {
        let old = old_version.map(parse_version).transpose()?;
        let mut planned = Vec::new();
        for rule in &self.rules {
            if !rule.applies(old.as_ref(), ctx) {
                continue;
            }
            let target = (rule.target)(ctx);
            let path = PathBuf::from(&target);
            if target.is_empty() || !path.components().all(|c| matches!(c, Component::Normal(_))) {
                return Err(GeneratorError::config(format!(
                    "cleanup target `{target}` for {} is not a relative project path",
                    rule.threshold
                )));
            }
            planned.push(PlannedRemoval {
                threshold: rule.threshold.clone(),
                action: rule.action,
                path,
            });
        }
        Ok(planned)
    }

    /// Remove every planned path below `project_root`.
    ///
    /// A path that is already gone counts as cleaned.
    pub fn apply(
        &self,
        old_version: Option<&str>,
        ctx: &GenerationContext,
        project_root: &Path,
    ) -> Result<Vec<Removal>> {
        let planned = self.plan(old_version, ctx)?;
        let mut removals = Vec::with_capacity(planned.len());
        for item in planned {
            let absolute = project_root.join(&item.path);
            let outcome = match item.action {
                CleanupAction::RemoveFile => fs::remove_file(&absolute),
                CleanupAction::RemoveFolder => fs::remove_dir_all(&absolute),
            };
            let removed = match outcome {
                Ok(()) => true,
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => return Err(GeneratorError::io(absolute, e)),
            };
            debug!(path = %item.path.display(), threshold = %item.threshold, removed, "Cleanup rule applied");
            removals.push(Removal {
                path: item.path,
                action: item.action,
                removed,
            });
        }
        info!(
            from_version = old_version.unwrap_or("<none>"),
            removed = removals.iter().filter(|r| r.removed).count(),
            "Cleanup finished"
        );
        Ok(removals)
    }
}

pub(crate) fn parse_version(version: &str) -> Result<Version> {
    Version::parse(version.trim()).map_err(|source| GeneratorError::Version {
        version: version.to_string(),
        source,
    })
}

/// Paths retired by past server generator releases.
pub fn builtin_plan() -> Result<CleanupPlan> {
    let java = |rest: &'static str| move |ctx: &GenerationContext| format!("{}{rest}", ctx.app().derived.java_dir);
    let test = |rest: &'static str| move |ctx: &GenerationContext| format!("{}{rest}", ctx.app().derived.test_dir);
    let resource = |rest: &'static str| {
        move |ctx: &GenerationContext| format!("{}{rest}", ctx.app().derived.main_resource_dir)
    };

    Ok(CleanupPlan::new(vec![
        CleanupRule::remove_file("4.0.0", java("config/locale/AngularCookieLocaleResolver.java"))?,
        CleanupRule::remove_folder("4.0.0", java("config/locale"))?,
        CleanupRule::remove_file("4.0.0", java("config/hazelcast/HazelcastCacheRegionFactory.java"))?
            .when(|ctx| ctx.app().derived.cache_provider_hazelcast),
        CleanupRule::remove_file("5.0.0", java("config/ThymeleafConfiguration.java"))?,
        CleanupRule::remove_file("5.0.0", java("web/rest/ProfileInfoResource.java"))?,
        CleanupRule::remove_file("5.0.0", resource("mails/activationEmail.html"))?,
        CleanupRule::remove_file("5.0.0", resource("mails/creationEmail.html"))?,
        CleanupRule::remove_file("5.0.0", resource("mails/passwordResetEmail.html"))?,
        CleanupRule::remove_file("5.0.0", resource("mails/socialRegistrationValidationEmail.html"))?,
        CleanupRule::remove_file("5.8.0", java("config/MetricsConfiguration.java"))?,
        CleanupRule::remove_file("6.0.0", java("web/rest/errors/CustomParameterizedException.java"))?,
        CleanupRule::remove_file("6.0.0", java("web/rest/errors/InternalServerErrorException.java"))?,
        CleanupRule::remove_file("6.0.0", java("web/rest/util/PaginationUtil.java"))?,
        CleanupRule::remove_file("6.0.0", java("web/rest/util/HeaderUtil.java"))?,
        CleanupRule::remove_file("6.0.0", test("web/rest/util/PaginationUtilUnitTest.java"))?,
        CleanupRule::remove_file("6.0.0", java("web/rest/vm/LoggerVM.java"))?,
        CleanupRule::remove_file("6.0.0", java("web/rest/LogsResource.java"))?,
        CleanupRule::remove_file("6.0.0", test("web/rest/LogsResourceIT.java"))?,
        CleanupRule::remove_file("6.0.0", java("config/OAuth2Configuration.java"))?
            .when(|ctx| ctx.app().derived.authentication_type_oauth2),
        CleanupRule::remove_file("6.0.0", java("security/OAuth2AuthenticationSuccessHandler.java"))?
            .when(|ctx| ctx.app().derived.authentication_type_oauth2),
        CleanupRule::remove_file("6.1.0", java("config/ReactivePageableHandlerMethodArgumentResolver.java"))?
            .when(|ctx| ctx.app().config.reactive),
        CleanupRule::remove_file("6.1.0", java("config/ReactiveSortHandlerMethodArgumentResolver.java"))?
            .when(|ctx| ctx.app().config.reactive),
        CleanupRule::remove_file("6.4.0", java("web/rest/errors/ErrorVM.java"))?,
        CleanupRule::remove_file("6.4.0", java("web/rest/errors/ParameterizedErrorVM.java"))?,
        CleanupRule::remove_file("6.6.1", java("web/rest/errors/EmailNotFoundException.java"))?,
        CleanupRule::remove_file("6.6.1", java("config/DefaultProfileUtil.java"))?,
        CleanupRule::remove_folder("6.6.1", java("service/util"))?,
        CleanupRule::remove_file("6.8.0", resource("config/tls/keystore.p12"))?,
        CleanupRule::remove_file("7.0.0", java("config/CloudDatabaseConfiguration.java"))?,
        CleanupRule::remove_file("7.0.0", java("security/oauth2/CookieCollection.java"))?
            .when(|ctx| ctx.app().derived.authentication_type_oauth2),
        CleanupRule::remove_file("7.0.0", java("web/rest/UserJWTController.java"))?
            .when(|ctx| ctx.app().derived.application_type_microservice),
        CleanupRule::remove_file("7.0.0", test("config/timezone/HibernateTimeZoneIT.java"))?,
        CleanupRule::remove_file("7.0.0", test("repository/timezone/DateTimeWrapper.java"))?,
        CleanupRule::remove_file("7.0.0", test("repository/timezone/DateTimeWrapperRepository.java"))?,
        CleanupRule::remove_file("7.0.0", resource("config/liquibase/changelog/00000000000000_initial_schema.xml"))?
            .when(|ctx| !ctx.app().derived.database_type_sql),
    ]))
}
