use std::sync::Arc;

use crate::services::refresh::Dashboard;

pub type AppState = Arc<Dashboard>;
