//! Status query model and parser.
//!
//! Grammar (keywords case-insensitive, whitespace around tokens ignored):
//!
//! ```text
//! query    := item (";" item)*
//! item     := kind ":" (selector ":")? facets
//! facets   := facet ("," facet)*
//! selector := "all" | <id>          (processor / connection / remoteprocessinggroup only)
//! ```
//!
//! Parsing never fails as a whole. An item that cannot be understood is kept
//! with its error so the assembler can decide what to emit for it.

use std::fmt;

use super::errors::StatusError;

/// The kind of component a query item targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Processor,
    Connection,
    RemoteProcessGroup,
    ControllerService,
    ReportingTask,
    Instance,
    SystemDiagnostics,
}

impl TargetKind {
    /// Resolve a query keyword (already trimmed) to a kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "processor" => Some(TargetKind::Processor),
            "connection" => Some(TargetKind::Connection),
            "remoteprocessinggroup" => Some(TargetKind::RemoteProcessGroup),
            "controllerservices" => Some(TargetKind::ControllerService),
            "provenancereporting" => Some(TargetKind::ReportingTask),
            "instance" => Some(TargetKind::Instance),
            "systemdiagnostics" => Some(TargetKind::SystemDiagnostics),
            _ => None,
        }
    }

    /// Kinds addressed as `kind:selector:facets`.
    pub fn is_selectable(self) -> bool {
        matches!(
            self,
            TargetKind::Processor | TargetKind::Connection | TargetKind::RemoteProcessGroup
        )
    }

    /// Plural noun used in "not a valid request for ..." fragments.
    pub fn plural(self) -> &'static str {
        match self {
            TargetKind::Processor => "processors",
            TargetKind::Connection => "connections",
            TargetKind::RemoteProcessGroup => "remote processing groups",
            TargetKind::ControllerService => "controller services",
            TargetKind::ReportingTask => "reporting tasks",
            TargetKind::Instance => "instances",
            TargetKind::SystemDiagnostics => "system diagnostics",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetKind::Processor => "processor",
            TargetKind::Connection => "connection",
            TargetKind::RemoteProcessGroup => "remote processing group",
            TargetKind::ControllerService => "controller service",
            TargetKind::ReportingTask => "reporting task",
            TargetKind::Instance => "instance",
            TargetKind::SystemDiagnostics => "system diagnostics",
        };
        f.write_str(s)
    }
}

/// Which records of a selectable kind to report on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    All,
    Id(String),
}

impl Selector {
    pub fn parse(section: &str) -> Self {
        let section = section.trim();
        if section.eq_ignore_ascii_case("all") {
            Selector::All
        } else {
            Selector::Id(section.to_string())
        }
    }
}

/// A named aspect of a component's status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Facet {
    Health,
    Stats,
    Bulletins,
    AuthorizationIssues,
    InputPorts,
    Heap,
    ProcessorStats,
    ContentRepositoryUsage,
    FlowFileRepositoryUsage,
    GarbageCollection,
    /// A facet name no kind understands. Kept lower-cased.
    Other(String),
}

impl Facet {
    pub fn parse(token: &str) -> Self {
        let token = token.trim().to_lowercase();
        match token.as_str() {
            "health" => Facet::Health,
            "stats" => Facet::Stats,
            "bulletins" => Facet::Bulletins,
            "authorizationissues" => Facet::AuthorizationIssues,
            "inputports" => Facet::InputPorts,
            "heap" => Facet::Heap,
            "processorstats" => Facet::ProcessorStats,
            "contentrepositoryusage" => Facet::ContentRepositoryUsage,
            "flowfilerepositoryusage" => Facet::FlowFileRepositoryUsage,
            "garbagecollection" => Facet::GarbageCollection,
            _ => Facet::Other(token),
        }
    }

    /// The lower-case keyword as it appears in a query.
    pub fn keyword(&self) -> &str {
        match self {
            Facet::Health => "health",
            Facet::Stats => "stats",
            Facet::Bulletins => "bulletins",
            Facet::AuthorizationIssues => "authorizationissues",
            Facet::InputPorts => "inputports",
            Facet::Heap => "heap",
            Facet::ProcessorStats => "processorstats",
            Facet::ContentRepositoryUsage => "contentrepositoryusage",
            Facet::FlowFileRepositoryUsage => "flowfilerepositoryusage",
            Facet::GarbageCollection => "garbagecollection",
            Facet::Other(token) => token,
        }
    }

    /// Title used as the fragment name, e.g. `<Health {...}>`.
    pub fn title(&self) -> &str {
        match self {
            Facet::Health => "Health",
            Facet::Stats => "Stats",
            Facet::Bulletins => "Bulletins",
            Facet::AuthorizationIssues => "Authorization Issue(s)",
            Facet::InputPorts => "Ports",
            Facet::Heap => "Heap",
            Facet::ProcessorStats => "Processor Stats",
            Facet::ContentRepositoryUsage => "Content Repository Usage",
            Facet::FlowFileRepositoryUsage => "FlowFile Repository Usage",
            Facet::GarbageCollection => "Garbage Collection",
            Facet::Other(token) => token,
        }
    }
}

/// What a well-formed item points at. Selectable kinds carry their selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Processor(Selector),
    Connection(Selector),
    RemoteProcessGroup(Selector),
    ControllerServices,
    ReportingTasks,
    Instance,
    SystemDiagnostics,
}

impl Target {
    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Processor(_) => TargetKind::Processor,
            Target::Connection(_) => TargetKind::Connection,
            Target::RemoteProcessGroup(_) => TargetKind::RemoteProcessGroup,
            Target::ControllerServices => TargetKind::ControllerService,
            Target::ReportingTasks => TargetKind::ReportingTask,
            Target::Instance => TargetKind::Instance,
            Target::SystemDiagnostics => TargetKind::SystemDiagnostics,
        }
    }

    /// Singleton kinds have no selector and ignore it.
    fn new(kind: TargetKind, selector: Selector) -> Self {
        match kind {
            TargetKind::Processor => Target::Processor(selector),
            TargetKind::Connection => Target::Connection(selector),
            TargetKind::RemoteProcessGroup => Target::RemoteProcessGroup(selector),
            TargetKind::ControllerService => Target::ControllerServices,
            TargetKind::ReportingTask => Target::ReportingTasks,
            TargetKind::Instance => Target::Instance,
            TargetKind::SystemDiagnostics => Target::SystemDiagnostics,
        }
    }
}

/// A well-formed request: one target and its facets in requested order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRequest {
    pub target: Target,
    pub facets: Vec<Facet>,
}

/// One `;`-separated unit of a query, kept next to its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryItem {
    pub raw: String,
    pub request: Result<StatusRequest, StatusError>,
}

impl QueryItem {
    pub fn is_unknown_kind(&self) -> bool {
        matches!(self.request, Err(StatusError::UnknownTargetKind(_)))
    }
}

/// A parsed query: items in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub items: Vec<QueryItem>,
}

impl Query {
    /// Split a raw query into items. Blank items (e.g. a trailing `;`) are dropped.
    pub fn parse(raw: &str) -> Self {
        let items = raw
            .split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(parse_item)
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn parse_item(item: &str) -> QueryItem {
    QueryItem {
        raw: item.to_string(),
        request: parse_request(item),
    }
}

fn parse_request(item: &str) -> Result<StatusRequest, StatusError> {
    let sections: Vec<&str> = item.split(':').collect();
    let keyword = sections[0].trim().to_lowercase();
    let kind = TargetKind::from_keyword(&keyword)
        .ok_or_else(|| StatusError::UnknownTargetKind(keyword.clone()))?;

    let malformed = |reason: &str| StatusError::MalformedQuery {
        item: item.to_string(),
        reason: reason.to_string(),
    };

    let (selector, facet_section) = if kind.is_selectable() {
        let selector = sections
            .get(1)
            .filter(|s| !s.trim().is_empty())
            .map(|s| Selector::parse(s))
            .ok_or_else(|| malformed("missing selector"))?;
        let facets = sections.get(2).ok_or_else(|| malformed("missing facet list"))?;
        (selector, *facets)
    } else {
        let facets = sections.get(1).ok_or_else(|| malformed("missing facet list"))?;
        (Selector::All, *facets)
    };

    let facets = parse_facets(facet_section);
    if facets.is_empty() {
        return Err(malformed("empty facet list"));
    }

    Ok(StatusRequest {
        target: Target::new(kind, selector),
        facets,
    })
}

/// Comma-split facet list; order kept, repeats and blanks dropped.
fn parse_facets(section: &str) -> Vec<Facet> {
    let mut facets: Vec<Facet> = Vec::new();
    for token in section.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let facet = Facet::parse(token);
        if !facets.contains(&facet) {
            facets.push(facet);
        }
    }
    facets
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_selectable_item() {
        let q = Query::parse("processor:all:health, stats ,bulletins");
        assert_eq!(q.len(), 1);
        let req = q.items[0].request.as_ref().unwrap();
        assert_eq!(req.target, Target::Processor(Selector::All));
        assert_eq!(req.facets, vec![Facet::Health, Facet::Stats, Facet::Bulletins]);
    }

    #[test]
    fn parses_multiple_items_in_order() {
        let q = Query::parse("connection:C1:health; processor:P1:health");
        assert_eq!(q.len(), 2);
        assert_eq!(q.items[0].raw, "connection:C1:health");
        assert_eq!(
            q.items[0].request.as_ref().unwrap().target,
            Target::Connection(Selector::Id("C1".to_string()))
        );
        assert_eq!(
            q.items[1].request.as_ref().unwrap().target,
            Target::Processor(Selector::Id("P1".to_string()))
        );
    }

    #[rstest]
    #[case::controller_services("controllerServices:health", Target::ControllerServices)]
    #[case::reporting("provenanceReporting:health", Target::ReportingTasks)]
    #[case::instance(" INSTANCE :health", Target::Instance)]
    #[case::diagnostics("systemDiagnostics:heap", Target::SystemDiagnostics)]
    #[case::rpg("remoteProcessingGroup:ALL:health", Target::RemoteProcessGroup(Selector::All))]
    fn keywords_are_case_insensitive(#[case] raw: &str, #[case] expected: Target) {
        let q = Query::parse(raw);
        assert_eq!(q.items[0].request.as_ref().unwrap().target, expected);
    }

    #[test]
    fn non_selectable_kind_takes_facets_from_second_section() {
        let q = Query::parse("systemdiagnostics:processorStats,heap");
        let req = q.items[0].request.as_ref().unwrap();
        assert_eq!(req.facets, vec![Facet::ProcessorStats, Facet::Heap]);
    }

    #[test]
    fn unknown_kind_is_kept_with_error() {
        let q = Query::parse("widget:all:health;instance:health");
        assert_eq!(q.len(), 2);
        assert!(q.items[0].is_unknown_kind());
        assert!(q.items[1].request.is_ok());
    }

    #[rstest]
    #[case::no_facets("processor:all")]
    #[case::no_selector("connection")]
    #[case::blank_selector("connection: :health")]
    #[case::empty_facets("instance: , ")]
    fn missing_sections_are_malformed(#[case] raw: &str) {
        let q = Query::parse(raw);
        assert_eq!(q.len(), 1);
        assert!(matches!(
            q.items[0].request,
            Err(StatusError::MalformedQuery { .. })
        ));
    }

    #[rstest]
    #[case::processor("processor::health")]
    #[case::connection("connection:  :stats")]
    #[case::remote_group("remoteprocessinggroup::health")]
    fn empty_selector_is_never_read_as_all(#[case] raw: &str) {
        let q = Query::parse(raw);
        match &q.items[0].request {
            Err(StatusError::MalformedQuery { reason, .. }) => assert_eq!(reason, "missing selector"),
            other => panic!("expected missing selector, got {other:?}"),
        }
    }

    #[test]
    fn blank_items_are_dropped() {
        let q = Query::parse("instance:health; ;");
        assert_eq!(q.len(), 1);
        assert!(Query::parse("").is_empty());
    }

    #[test]
    fn repeated_facets_keep_first_position() {
        let q = Query::parse("instance:stats,health,STATS");
        let req = q.items[0].request.as_ref().unwrap();
        assert_eq!(req.facets, vec![Facet::Stats, Facet::Health]);
    }

    #[test]
    fn unknown_facet_is_kept_lower_cased() {
        assert_eq!(Facet::parse(" Bogus "), Facet::Other("bogus".to_string()));
        assert_eq!(Facet::parse("inputPorts"), Facet::InputPorts);
    }
}
