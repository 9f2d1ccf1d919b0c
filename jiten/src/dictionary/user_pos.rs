//! ユーザー品詞データの読み取り専用アクセサ
//!
//! このモジュールは、事前計算されたユーザー品詞blobを開き、トークン配列と
//! 文字列配列の2つのバイトビューを公開します。blobは辞書イメージと同じ
//! セクション枠組み([`DictionaryFileParser`])で格納されており、構築時に
//! 整合性を検査します。ビルダーとは状態を共有しない独立した協調者です。

use crate::dictionary::file_codec::DictionaryFileParser;
use crate::errors::{JitenError, Result};

/// トークン配列セクションの名前
pub const TOKEN_ARRAY_SECTION: &str = "pos_token_array";

/// 文字列配列セクションの名前
pub const STRING_ARRAY_SECTION: &str = "string_array";

// Each record in the token array is a fixed 8-byte row.
const TOKEN_RECORD_LEN: usize = 8;

/// ユーザー品詞データ
///
/// blobを借用します。プロセス全体のシングルトンにはせず、必要な箇所で
/// 値として構築してください。
pub struct UserPosData<'a> {
    token_array: &'a [u8],
    string_array: &'a [u8],
}

impl<'a> UserPosData<'a> {
    /// blobを開き、整合性を検査します。
    ///
    /// # エラー
    ///
    /// 枠組みの破損、セクションの欠落、トークン配列長の不整合を検出した
    /// 場合にエラーを返します。
    pub fn from_slice(data: &'a [u8]) -> Result<Self> {
        let parser = DictionaryFileParser::from_slice(data)?;
        let token_array = parser.section(TOKEN_ARRAY_SECTION).ok_or_else(|| {
            JitenError::invalid_format("user_pos", "missing the pos token array section")
        })?;
        let string_array = parser.section(STRING_ARRAY_SECTION).ok_or_else(|| {
            JitenError::invalid_format("user_pos", "missing the pos string array section")
        })?;
        if token_array.len() % TOKEN_RECORD_LEN != 0 {
            return Err(JitenError::invalid_format(
                "user_pos",
                format!(
                    "token array length {} is not a multiple of {TOKEN_RECORD_LEN}",
                    token_array.len()
                ),
            ));
        }
        Ok(Self {
            token_array,
            string_array,
        })
    }

    /// トークン配列のバイトビューを返します。
    pub fn token_array(&self) -> &'a [u8] {
        self.token_array
    }

    /// 文字列配列のバイトビューを返します。
    pub fn string_array(&self) -> &'a [u8] {
        self.string_array
    }

    /// トークン配列のレコード数を返します。
    pub fn num_tokens(&self) -> usize {
        self.token_array.len() / TOKEN_RECORD_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::file_codec::{DictionaryFileCodec, DictionaryFileSection};

    fn blob(token_array: &[u8], string_array: &[u8]) -> Vec<u8> {
        let sections = [
            DictionaryFileSection::new(TOKEN_ARRAY_SECTION, token_array),
            DictionaryFileSection::new(STRING_ARRAY_SECTION, string_array),
        ];
        let mut out = vec![];
        DictionaryFileCodec::new()
            .write_sections(&sections, &mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_open_valid_blob() {
        let tokens = [0u8; 24];
        let strings = b"noun\0verb\0";
        let image = blob(&tokens, strings);
        let data = UserPosData::from_slice(&image).unwrap();
        assert_eq!(data.num_tokens(), 3);
        assert_eq!(data.token_array(), &tokens);
        assert_eq!(data.string_array(), strings.as_slice());
    }

    #[test]
    fn test_missing_section() {
        let sections = [DictionaryFileSection::new(TOKEN_ARRAY_SECTION, &[0u8; 8])];
        let mut image = vec![];
        DictionaryFileCodec::new()
            .write_sections(&sections, &mut image)
            .unwrap();
        assert!(UserPosData::from_slice(&image).is_err());
    }

    #[test]
    fn test_misaligned_token_array() {
        let image = blob(&[0u8; 7], b"");
        assert!(UserPosData::from_slice(&image).is_err());
    }

    #[test]
    fn test_corrupted_blob() {
        let mut image = blob(&[0u8; 8], b"x");
        image[0] ^= 0xff;
        assert!(UserPosData::from_slice(&image).is_err());
    }
}
