/// Data layer: core types, loading, and normalization.
///
/// Architecture:
/// ```text
///  HRL_historic_experiments.csv      Data_sets/<Key>.csv
///        │                                  │
///        ▼                                  ▼
///   ┌──────────────┐                 ┌──────────────┐
///   │ load_metadata │  clean Pr_p/Da  │load_experiment│  Ra_D, Nu
///   └──────────────┘                 └──────────────┘
///        │                                  │
///        ▼                                  ▼
///   ┌──────────┐                      ┌──────────┐
///   │ Metadata  │ ── Pr_p per row ──▶ │  filter   │  x = Ra_D/Pr_p, y = Nu/Pr_p, y <= 1.5
///   └──────────┘                      └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
