// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AttendeeListQuery, AttendeeProfile, AttendeeUpsert, CandidatePoolQuery, EventMetrics, Intro,
    IntroAction, IntroStatus, ScoringWeights, Suggestion,
};
pub use requests::{
    AttendeeLookupQuery, IntroActionRequest, IntroRespondQuery, MyIntrosQuery, RequestIntroRequest,
    RunMatchRequest, UpsertAttendeeRequest,
};
pub use responses::{
    AttendeeResponse, AttendeesResponse, ErrorResponse, HealthResponse, IntroStatusResponse, IntroView,
    MetricsResponse, MyIntrosResponse, PartnerSummary, RequestIntroResponse, RunMatchResponse,
    SuggestionView,
};
