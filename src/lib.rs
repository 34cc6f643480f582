/*!
# Lineboard

A browser-based production-line counter dashboard, built in Rust.

## Overview

Shop-floor staff watch one row per product and bump its counters — units
assembled, units shipped, units received at the front line, units completed —
against a threshold requested by the downstream consumer. The dashboard
derives a shortfall/surplus figure per product and keeps everything in a
shared worksheet so any station on the floor sees the same numbers.

## Architecture

The application follows a client-server architecture:

### Frontend Layer
- **Technologies**: HTML, CSS, JavaScript (fetch)
- **Key Components**:
  - Board Renderer - One header row plus one row per product
  - Field Controls - Per-field +/- buttons and click-to-select cells
  - Shared Controls - A single +/- pair driving the current selection
  - Reload Control - Manual refresh of live sheet data

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Counter Table - In-memory table of product records with derived columns
  - Selection - Session-scoped target of the shared controls
  - Board Session - Orchestrates the mutate → persist → reload cycle
  - Worksheet Store - Full-table read/write against the backing sheet
  - Error Handler - Store failures, retry-once write-back policy

### Data Persistence Layer
- CSV worksheet as the shared, unversioned store (full overwrite per write)
- Gzip-compressed bincode snapshots for point-in-time backups

## Key Features

- Five mutable counters per product, clamped at zero
- Derived shortfall/surplus, recomputed on every load and every change
- Tolerant loading: missing columns and non-numeric cells default to 0
- One click = one adjust = one full-table write-back = one reload
- Shared +/- controls bound to the last-clicked field
- CSV export including the derived columns
- Snapshot save and restore

## Modules

- **record**: ProductRecord and the CounterField enum
- **table**: CounterTable (load coercion, bounded adjustment, row output)
- **selection**: selection state machine for the shared controls
- **store**: Worksheet trait, CSV-backed implementation, CSV export
- **snapshot**: compressed table snapshots
- **board**: session orchestration and the write-back retry policy
- **error**: the BoardError taxonomy
- **config**: environment-driven runtime settings
- **app**: routing and handlers

## REST API Endpoints

- `GET /api/board` - Reload from the sheet and return the full table
- `POST /api/adjust` - Bump one field of one record
- `POST /api/select` - Point the shared controls at a field
- `POST /api/bump` - Apply a delta to the current selection
- `GET /api/export` - Download the table as CSV
- `POST /api/snapshot`, `POST /api/restore` - Snapshot save/restore
*/

// Re-export all modules so they appear in the documentation
pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod record;
pub mod selection;
pub mod snapshot;
pub mod store;
pub mod table;

/// Re-export everything from these modules to make it easier to use
pub use board::*;
pub use error::*;
pub use record::*;
pub use selection::*;
pub use snapshot::*;
pub use store::*;
pub use table::*;
