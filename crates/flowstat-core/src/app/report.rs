//! Report assembler - evaluates a query item by item and joins the blocks.
//!
//! Every recognized item yields exactly one entry in the report, joined with
//! `,` in input order. An item that fails (unknown id, provider failure,
//! malformed text) becomes an inline diagnostic block; nothing escapes
//! `assemble` and later items are always evaluated.

use tracing::{debug, warn};

use super::config::{ReporterConfig, UnknownKindPolicy};
use super::render::FacetRenderer;
use super::resolver::Resolver;
use crate::domain::{Query, QueryItem, StatusError, TargetKind};
use crate::ports::StatusProvider;

pub const EMPTY_REQUEST_MESSAGE: &str =
    "Cannot complete status request because the statusRequest is empty";

pub const PROVIDER_UNAVAILABLE_MESSAGE: &str =
    "Cannot complete status request because the status provider is unavailable";

#[derive(Debug, Clone, Default)]
pub struct StatusReporter {
    config: ReporterConfig,
}

impl StatusReporter {
    pub fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Parse `request` and assemble its report against `provider`.
    ///
    /// Returns a single descriptive message instead of a report when the
    /// request is blank or no provider is available.
    pub async fn report(&self, provider: Option<&dyn StatusProvider>, request: &str) -> String {
        if request.trim().is_empty() {
            warn!("received an empty status request");
            return EMPTY_REQUEST_MESSAGE.to_string();
        }
        let Some(provider) = provider else {
            warn!("received a status request but no status provider is available");
            return PROVIDER_UNAVAILABLE_MESSAGE.to_string();
        };
        self.assemble(provider, &Query::parse(request)).await
    }

    pub async fn assemble(&self, provider: &dyn StatusProvider, query: &Query) -> String {
        let mut resolver = Resolver::new(provider);
        let renderer = FacetRenderer::new(provider, &self.config);

        let mut blocks = Vec::with_capacity(query.len());
        for item in &query.items {
            if item.is_unknown_kind() && self.config.unknown_kinds == UnknownKindPolicy::Skip {
                warn!(item = %item.raw, "skipping status request item with unknown target kind");
                continue;
            }
            blocks.push(self.evaluate(&mut resolver, &renderer, item).await);
        }
        debug!(items = query.len(), blocks = blocks.len(), "assembled status report");
        blocks.join(",")
    }

    async fn evaluate(
        &self,
        resolver: &mut Resolver<'_>,
        renderer: &FacetRenderer<'_>,
        item: &QueryItem,
    ) -> String {
        match self.try_evaluate(resolver, renderer, item).await {
            Ok(block) => block,
            Err(StatusError::NotFound { kind, id }) => {
                warn!(%kind, %id, "no record with the requested key");
                format!("[No {} with key {id} to report status on]", not_found_label(kind))
            }
            Err(err) => {
                warn!(item = %item.raw, error = %err, "failed to get status for request item");
                format!("[Unable to get status for request '{}' due to:{err}]", item.raw)
            }
        }
    }

    async fn try_evaluate(
        &self,
        resolver: &mut Resolver<'_>,
        renderer: &FacetRenderer<'_>,
        item: &QueryItem,
    ) -> Result<String, StatusError> {
        let request = item.request.as_ref().map_err(Clone::clone)?;
        let records = resolver.resolve_target(&request.target).await?;
        if records.is_empty() {
            return Ok(format!(
                "[No {} to return status for]",
                request.target.kind().plural()
            ));
        }

        let mut out = String::new();
        for record in &records {
            let body = renderer.render_record(record, &request.facets).await?;
            out.push('[');
            out.push_str(&body);
            out.push(']');
        }
        Ok(out)
    }
}

fn not_found_label(kind: TargetKind) -> String {
    match kind {
        TargetKind::RemoteProcessGroup => "Remote Processing Group".to_string(),
        other => other.to_string(),
    }
}
