//! Credential resolution from environment settings.

use super::Credential;
use crate::config::Settings;

impl Credential {
    /// Resolves a credential from settings.
    ///
    /// The first source that is fully present wins; sources are never
    /// combined:
    ///
    /// 1. `GANTRY_API_TOKEN` → [`Credential::Bearer`]
    /// 2. `GANTRY_USER_ID` + `GANTRY_USER_PAT` → [`Credential::user`]
    /// 3. `GANTRY_DATASOURCE_ID` + `GANTRY_DATASOURCE_SECRET` → [`Credential::datasource`]
    ///
    /// Returns `None` when no source is complete. That is not an error:
    /// requests are then sent without an `Authorization` header and the API
    /// decides whether to reject them.
    pub fn resolve(settings: &Settings) -> Option<Self> {
        let resolved = if let Some(token) = &settings.api_token {
            Some(Credential::bearer(token.as_str()))
        } else if let (Some(id), Some(pat)) = (&settings.user_id, &settings.user_pat) {
            Some(Credential::user(id, pat.as_str()))
        } else if let (Some(id), Some(secret)) =
            (&settings.datasource_id, &settings.datasource_secret)
        {
            Some(Credential::datasource(id, secret.as_str()))
        } else {
            None
        };

        match &resolved {
            Some(creds) => tracing::debug!(scheme = creds.scheme(), "resolved credential"),
            None => tracing::debug!("no credential configured"),
        }

        resolved
    }

    /// Resolves a credential from the process environment.
    pub fn from_env() -> Option<Self> {
        Self::resolve(&Settings::from_env())
    }
}
