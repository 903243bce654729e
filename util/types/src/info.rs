use ckb_types::{bytes::Bytes, H256};

use crate::error::Error;

/// Whether a deployment still accepts mints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MintStatus {
    /// Anyone may mint up to the per-mint limit.
    Open = 0,
    /// Minting is finished; rebasing may follow.
    Closed = 1,
}

impl MintStatus {
    fn from_u8(byte: u8) -> Result<Self, Error> {
        match byte {
            0 => Ok(MintStatus::Open),
            1 => Ok(MintStatus::Closed),
            _ => Err(Error::MalformedCellData("unknown mint status")),
        }
    }
}

/// The metadata payload an info cell carries for one deployment.
///
/// `max_supply` and `mint_limit` count whole tokens; unit amounts are scaled
/// by `10^decimal` when token cells are produced. The payload is mutated in
/// place on chain (same cell identity, new data) by the close and rebase-info
/// operations; both transitions are one way.
///
/// Byte layout of the cell data:
/// `decimal(1) | name_len(1) | name | symbol_len(1) | symbol | token_hash(32)
/// | max_supply(16, LE) | mint_limit(16, LE) | mint_status(1) [| rebase_hash(32)]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InscriptionInfo {
    /// Decimal places of a token unit.
    pub decimal: u8,
    /// Human readable token name, at most 255 bytes of UTF-8.
    pub name: String,
    /// Ticker symbol, at most 255 bytes of UTF-8.
    pub symbol: String,
    /// Hash of the pre-mint token type script.
    pub token_hash: H256,
    /// Whole-token cap on total supply.
    pub max_supply: u128,
    /// Whole tokens minted per mint transaction.
    pub mint_limit: u128,
    /// Current mint status.
    pub mint_status: MintStatus,
    /// Hash of the rebased token type script, stamped by rebase-info.
    pub rebase_hash: Option<H256>,
}

fn take<'a>(data: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8], Error> {
    let end = offset
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or(Error::MalformedCellData("truncated inscription info"))?;
    let slice = &data[*offset..end];
    *offset = end;
    Ok(slice)
}

/// `10^decimal`, the factor between whole tokens and token units.
pub fn unit_factor(decimal: u8) -> Result<u128, Error> {
    10u128
        .checked_pow(u32::from(decimal))
        .ok_or(Error::Overflow("decimal unit factor"))
}

impl InscriptionInfo {
    /// Serializes the payload as info cell data.
    pub fn to_bytes(&self) -> Result<Bytes, Error> {
        if self.name.len() > u8::MAX as usize {
            return Err(Error::MalformedCellData("name longer than 255 bytes"));
        }
        if self.symbol.len() > u8::MAX as usize {
            return Err(Error::MalformedCellData("symbol longer than 255 bytes"));
        }
        let mut data = Vec::with_capacity(self.data_size());
        data.push(self.decimal);
        data.push(self.name.len() as u8);
        data.extend_from_slice(self.name.as_bytes());
        data.push(self.symbol.len() as u8);
        data.extend_from_slice(self.symbol.as_bytes());
        data.extend_from_slice(self.token_hash.as_bytes());
        data.extend_from_slice(&self.max_supply.to_le_bytes());
        data.extend_from_slice(&self.mint_limit.to_le_bytes());
        data.push(self.mint_status as u8);
        if let Some(rebase_hash) = &self.rebase_hash {
            data.extend_from_slice(rebase_hash.as_bytes());
        }
        Ok(Bytes::from(data))
    }

    /// Parses info cell data.
    pub fn from_slice(data: &[u8]) -> Result<Self, Error> {
        let mut offset = 0usize;
        let decimal = take(data, &mut offset, 1)?[0];
        let name_len = take(data, &mut offset, 1)?[0] as usize;
        let name = String::from_utf8(take(data, &mut offset, name_len)?.to_vec())
            .map_err(|_| Error::MalformedCellData("info name is not UTF-8"))?;
        let symbol_len = take(data, &mut offset, 1)?[0] as usize;
        let symbol = String::from_utf8(take(data, &mut offset, symbol_len)?.to_vec())
            .map_err(|_| Error::MalformedCellData("info symbol is not UTF-8"))?;
        let token_hash = H256::from_slice(take(data, &mut offset, 32)?)
            .map_err(|_| Error::MalformedCellData("info token hash"))?;
        let mut le = [0u8; 16];
        le.copy_from_slice(take(data, &mut offset, 16)?);
        let max_supply = u128::from_le_bytes(le);
        le.copy_from_slice(take(data, &mut offset, 16)?);
        let mint_limit = u128::from_le_bytes(le);
        let mint_status = MintStatus::from_u8(take(data, &mut offset, 1)?[0])?;
        let rebase_hash = if offset == data.len() {
            None
        } else {
            Some(
                H256::from_slice(take(data, &mut offset, 32)?)
                    .map_err(|_| Error::MalformedCellData("info rebase hash"))?,
            )
        };
        if offset != data.len() {
            return Err(Error::MalformedCellData("trailing bytes after info"));
        }

        Ok(InscriptionInfo {
            decimal,
            name,
            symbol,
            token_hash,
            max_supply,
            mint_limit,
            mint_status,
            rebase_hash,
        })
    }

    /// Serialized size of the payload in its current state.
    pub fn data_size(&self) -> usize {
        let rebase = if self.rebase_hash.is_some() { 32 } else { 0 };
        1 + 1 + self.name.len() + 1 + self.symbol.len() + 32 + 16 + 16 + 1 + rebase
    }

    /// Size the info cell is provisioned for: the current payload plus room
    /// for the rebase hash stamped later, so the rebase-info mutation never
    /// outgrows the cell.
    pub fn provisioned_size(&self) -> usize {
        let reserve = if self.rebase_hash.is_some() { 0 } else { 32 };
        self.data_size() + reserve
    }

    /// Marks the deployment closed. One way: closing a closed deployment is
    /// an error.
    pub fn set_closed(&mut self) -> Result<(), Error> {
        if self.mint_status != MintStatus::Open {
            return Err(Error::InvalidStateTransition(
                "deployment is already closed",
            ));
        }
        self.mint_status = MintStatus::Closed;
        Ok(())
    }

    /// Stamps the rebased token hash. Requires a closed deployment and may
    /// happen only once.
    pub fn set_rebased(&mut self, rebase_hash: H256) -> Result<(), Error> {
        if self.mint_status != MintStatus::Closed {
            return Err(Error::InvalidStateTransition(
                "rebase requires a closed deployment",
            ));
        }
        if self.rebase_hash.is_some() {
            return Err(Error::InvalidStateTransition(
                "deployment is already rebased",
            ));
        }
        self.rebase_hash = Some(rebase_hash);
        Ok(())
    }

    /// Total supply in token units when every mint reaches the cap.
    pub fn expected_supply(&self) -> Result<u128, Error> {
        self.max_supply
            .checked_mul(unit_factor(self.decimal)?)
            .ok_or(Error::Overflow("expected supply"))
    }

    /// Token units produced by a single mint.
    pub fn mint_amount(&self) -> Result<u128, Error> {
        self.mint_limit
            .checked_mul(unit_factor(self.decimal)?)
            .ok_or(Error::Overflow("mint amount"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckb_types::h256;

    fn sample() -> InscriptionInfo {
        InscriptionInfo {
            decimal: 8,
            name: "CKB Fist Inscription".to_owned(),
            symbol: "CKBI".to_owned(),
            token_hash: h256!("0x1122334455667788112233445566778811223344556677881122334455667788"),
            max_supply: 21_000_000,
            mint_limit: 1_000,
            mint_status: MintStatus::Open,
            rebase_hash: None,
        }
    }

    #[test]
    fn codec_round_trips() {
        let info = sample();
        let data = info.to_bytes().unwrap();
        assert_eq!(data.len(), info.data_size());
        assert_eq!(InscriptionInfo::from_slice(&data).unwrap(), info);
    }

    #[test]
    fn codec_round_trips_with_rebase_hash() {
        let mut info = sample();
        info.mint_status = MintStatus::Closed;
        info.rebase_hash = Some(h256!(
            "0xaabbccddaabbccddaabbccddaabbccddaabbccddaabbccddaabbccddaabbccdd"
        ));
        let data = info.to_bytes().unwrap();
        assert_eq!(InscriptionInfo::from_slice(&data).unwrap(), info);
        assert_eq!(info.provisioned_size(), info.data_size());
    }

    #[test]
    fn provisioned_size_reserves_rebase_slot() {
        let info = sample();
        assert_eq!(info.provisioned_size(), info.data_size() + 32);
    }

    #[test]
    fn truncated_data_is_rejected() {
        let data = sample().to_bytes().unwrap();
        for end in [0, 1, 5, data.len() - 1] {
            assert!(InscriptionInfo::from_slice(&data[..end]).is_err());
        }
    }

    #[test]
    fn close_is_one_way() {
        let mut info = sample();
        info.set_closed().unwrap();
        assert_eq!(info.mint_status, MintStatus::Closed);
        assert_eq!(
            info.set_closed(),
            Err(Error::InvalidStateTransition("deployment is already closed"))
        );
    }

    #[test]
    fn rebase_stamp_requires_closed_and_is_exclusive() {
        let hash = h256!("0xaabbccddaabbccddaabbccddaabbccddaabbccddaabbccddaabbccddaabbccdd");
        let mut info = sample();
        assert!(info.set_rebased(hash.clone()).is_err());
        info.set_closed().unwrap();
        info.set_rebased(hash.clone()).unwrap();
        assert_eq!(
            info.set_rebased(hash),
            Err(Error::InvalidStateTransition("deployment is already rebased"))
        );
    }

    #[test]
    fn mint_amount_scales_by_decimal() {
        assert_eq!(sample().mint_amount().unwrap(), 1_000 * 100_000_000);
        assert_eq!(
            sample().expected_supply().unwrap(),
            21_000_000 * 100_000_000
        );
    }

    #[test]
    fn oversized_unit_factor_overflows() {
        assert_eq!(unit_factor(39), Err(Error::Overflow("decimal unit factor")));
        assert!(unit_factor(38).is_ok());
    }
}
