// Domain-layer modules and shared errors/models
pub mod crm_cleaner {
    pub use crate::crm_cleaner::*;
}

pub mod normalizers {
    pub use crate::normalizers::*;
}

pub mod validators {
    pub use crate::validators::*;
}

pub mod qualification {
    pub use crate::qualification::*;
}

pub mod dashboard {
    pub use crate::dashboard::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
