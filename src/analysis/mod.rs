/// Analysis layer: grouped means, descriptive statistics and ANOVA over
/// filtered views, assembled into per-tab reports.
///
/// ```text
///   FilteredView ──► aggregate ──► GroupMeans / Summary ─┐
///        │                                               ├─► report ──► TabReport
///        └─────────► anova ─────► TestOutcome ───────────┘
/// ```

pub mod aggregate;
pub mod anova;
pub mod report;
