//! Conversions from wire types to KYC domain types.

use super::wire::KycResponse;
use super::{KycRecord, KycStatus};

impl From<KycResponse> for KycRecord {
    fn from(k: KycResponse) -> Self {
        Self {
            id: k.id,
            emirates_id: k.emirates_id.unwrap_or_default(),
            passport_no: k.passport_no,
            source_of_funds: k.source_of_funds.unwrap_or_default(),
            front_image: k.emirates_id_front_img,
            back_image: k.emirates_id_back_img,
            visa_copy: k.visa_copy,
            status: k.status.as_deref().map(KycStatus::parse).unwrap_or_default(),
            reason: k.reason,
            created_at: k.created_at,
        }
    }
}
