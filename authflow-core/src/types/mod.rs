//! 类型定义模块

mod backend;
mod credential;
mod dialog;
mod identify;

pub use backend::{BackendPolicy, GatewayConfig, StorageBackend, DEFAULT_IDENTIFY_SNAP_ID};
pub use credential::{
    decode_collection, decode_state, encode_state, BasicCredential, CredentialCollection,
    CredentialData, CredentialKind, CredentialRecord, DecodedState, IdentifyCredential,
    RawCredentialRecord,
};
pub use dialog::DialogContent;
pub use identify::{IdentifyParams, StoreOptions, SyncReport, VcFilter};
