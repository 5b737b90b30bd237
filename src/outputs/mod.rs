//! Output generation.
//!
//! - [`markdown`]: Renders the scraped listings into the text that replaces
//!   the remote document body
//!
//! # Document Layout
//!
//! ```text
//! # Python pracovní nabídky
//! Poslední aktualizace: 14.03.2025 09:30
//! Počet nalezených nabídek: 2
//!
//! ## Backend Developer
//! URL adresa: https://www.jobs.cz/rpd/2000123456/
//! ID inzerátu: 2000123456
//! Společnost: Acme s.r.o.
//! Lokalita: Praha
//! Text inzerátu:
//! ...
//!
//! ---
//! ```

pub mod markdown;
