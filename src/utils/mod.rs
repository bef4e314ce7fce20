use crate::core::{Asset, AssetId, SwapError, SwapResult};
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{
    AccountId, AlphaNum12, AlphaNum4, Asset as XdrAsset, AssetCode12, AssetCode4,
    ContractIdPreimage, Hash, HashIdPreimage, HashIdPreimageContractId, Limits, PublicKey,
    Uint256, WriteXdr,
};

const STRKEY_LEN: usize = 56;
const MAX_ASSET_CODE_LEN: usize = 12;

/// A classic Stellar asset written as `CODE:ISSUER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicAsset {
    pub code: String,
    pub issuer: String,
}

impl ClassicAsset {
    pub fn parse(input: &str) -> SwapResult<Self> {
        let (code, issuer) = input
            .split_once(':')
            .ok_or_else(|| SwapError::InputInvalid(format!("expected CODE:ISSUER, got '{}'", input)))?;

        if code.is_empty()
            || code.len() > MAX_ASSET_CODE_LEN
            || !code.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(SwapError::InputInvalid(format!("invalid asset code '{}'", code)));
        }

        if !is_strkey(issuer, 'G') {
            return Err(SwapError::InputInvalid(format!("invalid issuer '{}'", issuer)));
        }

        Ok(Self {
            code: code.to_string(),
            issuer: issuer.to_string(),
        })
    }

    /// Address of the Stellar Asset Contract wrapping this asset on the
    /// network named by `network_passphrase`.
    pub fn contract_id(&self, network_passphrase: &str) -> SwapResult<AssetId> {
        sac_address(self.to_xdr_asset()?, network_passphrase)
    }

    fn to_xdr_asset(&self) -> SwapResult<XdrAsset> {
        let key = stellar_strkey::ed25519::PublicKey::from_string(&self.issuer)
            .map_err(|_| SwapError::InputInvalid(format!("invalid issuer '{}'", self.issuer)))?;
        let issuer = AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(key.0)));

        let code = self.code.as_bytes();
        match code.len() {
            1..=4 => {
                let mut asset_code = [0u8; 4];
                asset_code[..code.len()].copy_from_slice(code);
                Ok(XdrAsset::CreditAlphanum4(AlphaNum4 {
                    asset_code: AssetCode4(asset_code),
                    issuer,
                }))
            }
            5..=MAX_ASSET_CODE_LEN => {
                let mut asset_code = [0u8; 12];
                asset_code[..code.len()].copy_from_slice(code);
                Ok(XdrAsset::CreditAlphanum12(AlphaNum12 {
                    asset_code: AssetCode12(asset_code),
                    issuer,
                }))
            }
            _ => Err(SwapError::InputInvalid(format!("invalid asset code '{}'", self.code))),
        }
    }
}

// sha256(HashIdPreimage::ContractId { sha256(passphrase), asset })
fn sac_address(asset: XdrAsset, network_passphrase: &str) -> SwapResult<AssetId> {
    let network_id: [u8; 32] = Sha256::digest(network_passphrase.as_bytes()).into();
    let preimage = HashIdPreimage::ContractId(HashIdPreimageContractId {
        network_id: Hash(network_id),
        contract_id_preimage: ContractIdPreimage::Asset(asset),
    });
    let xdr = preimage
        .to_xdr(Limits::none())
        .map_err(|e| SwapError::InputInvalid(format!("cannot encode asset: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&xdr);
    let contract: [u8; 32] = hasher.finalize().into();
    Ok(AssetId::Contract(stellar_strkey::Contract(contract).to_string()))
}

/// Contract address under which `id` trades on Soroban. Contract ids are returned as is.
pub fn asset_contract_id(id: &AssetId, network_passphrase: &str) -> SwapResult<AssetId> {
    match id {
        AssetId::Contract(_) => Ok(id.clone()),
        AssetId::Native => sac_address(XdrAsset::Native, network_passphrase),
        AssetId::Classic { code, issuer } => ClassicAsset {
            code: code.clone(),
            issuer: issuer.clone(),
        }
        .contract_id(network_passphrase),
    }
}

impl From<ClassicAsset> for AssetId {
    fn from(asset: ClassicAsset) -> Self {
        AssetId::Classic {
            code: asset.code,
            issuer: asset.issuer,
        }
    }
}

fn is_strkey(value: &str, prefix: char) -> bool {
    value.len() == STRKEY_LEN
        && value.starts_with(prefix)
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c))
}

/// Parse a contract address, `CODE:ISSUER`, or `native`/`XLM` into an asset id
pub fn parse_asset_identifier(input: &str) -> SwapResult<AssetId> {
    let input = input.trim();

    if input.eq_ignore_ascii_case("native") || input.eq_ignore_ascii_case("xlm") {
        return Ok(AssetId::Native);
    }
    if is_strkey(input, 'C') {
        return Ok(AssetId::Contract(input.to_string()));
    }
    if input.contains(':') {
        return ClassicAsset::parse(input).map(AssetId::from);
    }

    Err(SwapError::InputInvalid(format!("unrecognized asset '{}'", input)))
}

/// Look up a token by symbol (case-insensitive) or identifier.
///
/// With a passphrase, a `CODE:ISSUER` query also finds the token listed
/// under its asset contract address.
pub fn find_asset<'a>(
    tokens: &'a [Asset],
    query: &str,
    network_passphrase: Option<&str>,
) -> Option<&'a Asset> {
    let by_id = parse_asset_identifier(query).ok();
    let by_contract = match (&by_id, network_passphrase) {
        (Some(id), Some(passphrase)) => asset_contract_id(id, passphrase).ok(),
        _ => None,
    };

    tokens.iter().find(|token| {
        token.symbol.eq_ignore_ascii_case(query)
            || by_id.as_ref() == Some(&token.id)
            || by_contract.as_ref() == Some(&token.id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MAINNET_PASSPHRASE, TESTNET_PASSPHRASE};
    use test_case::test_case;

    const ISSUER: &str = "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN";
    const CONTRACT: &str = "CCW67TSZV3SSS2HXMBQ5JFGCKJNXKZM7UQUWUZPUTHXSTZLEO7SJMI75";
    const TESTNET_USDC_ISSUER: &str = "GBBD47IF6LWK7P7MDEVSCWR7DPUWV3NY3DTQEVFL4NAT4AQH3ZLLFLA5";

    #[test]
    fn test_parse_classic_asset() {
        let asset = ClassicAsset::parse(&format!("USDC:{}", ISSUER)).unwrap();
        assert_eq!(asset.code, "USDC");
        assert_eq!(asset.issuer, ISSUER);

        assert!(ClassicAsset::parse("USDC").is_err());
        assert!(ClassicAsset::parse(&format!(":{}", ISSUER)).is_err());
        assert!(ClassicAsset::parse(&format!("TOOLONGCODE123:{}", ISSUER)).is_err());
        assert!(ClassicAsset::parse(&format!("US-D:{}", ISSUER)).is_err());
        assert!(ClassicAsset::parse("USDC:GSHORT").is_err());
        assert!(ClassicAsset::parse(&format!("USDC:{}", CONTRACT)).is_err());
    }

    #[test]
    fn test_parse_asset_identifier() {
        assert_eq!(parse_asset_identifier("native").unwrap(), AssetId::Native);
        assert_eq!(parse_asset_identifier("XLM").unwrap(), AssetId::Native);
        assert_eq!(
            parse_asset_identifier(CONTRACT).unwrap(),
            AssetId::Contract(CONTRACT.to_string())
        );
        assert_eq!(
            parse_asset_identifier(&format!("AQUA:{}", ISSUER)).unwrap(),
            AssetId::Classic {
                code: "AQUA".to_string(),
                issuer: ISSUER.to_string()
            }
        );
        assert!(parse_asset_identifier("UNKNOWN").is_err());
    }

    #[test]
    fn test_find_asset() {
        let tokens = vec![
            Asset::new(AssetId::Contract(CONTRACT.to_string()), "USDC", "USD Coin", 7),
            Asset::new(AssetId::Native, "XLM", "Stellar Lumens", 7),
        ];

        let find = |query: &str| find_asset(&tokens, query, None).map(|t| t.symbol.as_str());
        assert_eq!(find_asset(&tokens, "usdc", None).map(|t| t.name.as_str()), Some("USD Coin"));
        assert_eq!(find(CONTRACT), Some("USDC"));
        assert_eq!(find("native"), Some("XLM"));
        assert_eq!(find("BTC"), None);
    }

    #[test]
    fn test_find_classic_asset_by_contract() {
        let tokens = vec![Asset::new(AssetId::Contract(CONTRACT.to_string()), "USDC", "USD Coin", 7)];
        let query = format!("USDC:{}", ISSUER);

        assert!(find_asset(&tokens, &query, None).is_none());
        assert_eq!(
            find_asset(&tokens, &query, Some(MAINNET_PASSPHRASE)).map(|t| t.name.as_str()),
            Some("USD Coin")
        );
        assert!(find_asset(&tokens, &query, Some(TESTNET_PASSPHRASE)).is_none());
    }

    #[test_case("USDC", ISSUER, MAINNET_PASSPHRASE => CONTRACT.to_string(); "mainnet usdc")]
    #[test_case("USDC", TESTNET_USDC_ISSUER, TESTNET_PASSPHRASE
        => "CBIELTK6YBZJU5UP2WWQEUCYKLPU6AUNZ2BQ4WWFEIE3USCIHMXQDAMA".to_string(); "testnet usdc")]
    fn test_classic_contract_id(code: &str, issuer: &str, passphrase: &str) -> String {
        let asset = ClassicAsset {
            code: code.to_string(),
            issuer: issuer.to_string(),
        };
        match asset.contract_id(passphrase).unwrap() {
            AssetId::Contract(address) => address,
            other => panic!("expected a contract id, got {:?}", other),
        }
    }

    #[test]
    fn test_asset_contract_id() {
        assert_eq!(
            asset_contract_id(&AssetId::Native, TESTNET_PASSPHRASE).unwrap(),
            AssetId::Contract("CDLZFC3SYJYDZT7K67VZ75HPJVIEUVNIXF47ZG2FB2RMQQVU2HHGCYSC".to_string())
        );
        assert_eq!(
            asset_contract_id(&AssetId::Native, MAINNET_PASSPHRASE).unwrap(),
            AssetId::Contract("CAS3J7GYLGXMF6TDJBBYYSE3HQ6BBSMLNUQ34T6TZMYMW2EVH34XOWMA".to_string())
        );

        let contract = AssetId::Contract(CONTRACT.to_string());
        assert_eq!(asset_contract_id(&contract, TESTNET_PASSPHRASE).unwrap(), contract);
    }

    #[test]
    fn test_contract_id_rejects_bad_issuer() {
        // Right shape, wrong checksum
        let asset = ClassicAsset {
            code: "USDC".to_string(),
            issuer: format!("{}A", &ISSUER[..55]),
        };
        assert!(matches!(
            asset.contract_id(MAINNET_PASSPHRASE),
            Err(SwapError::InputInvalid(_))
        ));

        let too_long = ClassicAsset {
            code: "THIRTEENCHARS".to_string(),
            issuer: ISSUER.to_string(),
        };
        assert!(too_long.contract_id(MAINNET_PASSPHRASE).is_err());
    }
}
