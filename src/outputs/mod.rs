//! Output generation.
//!
//! One output today: [`json`] writes the `news.json` document the site's
//! page generators and front-end scripts consume. The JSON shape is the only
//! contract between this pipeline and those collaborators.

pub mod json;
