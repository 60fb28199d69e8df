//! Shared move-payload parsing helpers.

use super::GameError;

pub(crate) fn parse_u32_be(payload: &[u8], offset: usize) -> Result<u32, GameError> {
    let end = offset.saturating_add(4);
    if payload.len() < end {
        return Err(GameError::InvalidPayload);
    }
    let bytes: [u8; 4] = payload[offset..end]
        .try_into()
        .map_err(|_| GameError::InvalidPayload)?;
    Ok(u32::from_be_bytes(bytes))
}
