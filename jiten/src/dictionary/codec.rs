//! システム辞書の符号化器
//!
//! このモジュールは、読み・表層形・トークン列を辞書イメージのバイト表現へ
//! 変換する純粋な符号化器を提供します。バイトレイアウトはランタイムとの
//! 契約であり、読み取り側の復号器も同じ文法を共有します。
//!
//! # トークンレコードの文法
//!
//! 各トークンはフラグ1バイトと可変長の本体から成ります:
//!
//! ```text
//! flags: bit0-1 品詞形式 (0=既定, 1=頻出表, 2=直前と同じ)
//!        bit2-3 値形式   (0=既定, 1=直前と同じ, 2=ひらがなそのまま,
//!                         3=カタカナそのまま)
//!        bit4   1バイトコスト
//!        bit5   綴り訂正属性
//!        bit6   レコード末尾のトークン
//!        bit7   常に0
//! body:  品詞  既定 => lid u16 LE + rid u16 LE / 頻出表 => id 1バイト
//!        コスト 既定 => i16 LE / 1バイト => (cost >> 8)
//!        値    既定 => 値トライid u24 LE
//! ```
//!
//! 正当なレコードの先頭バイトはbit7が0なので、終端センチネル0xFFが
//! レコード先頭に現れることはありません。

use crate::dictionary::word_info::{CostType, PosType, TokenInfo, ValueType};
use crate::dictionary::SPELLING_CORRECTION;
use crate::errors::{JitenError, Result};

// Token flags.
const POS_TYPE_MASK: u8 = 0x03;
const POS_TYPE_FREQUENT: u8 = 0x01;
const POS_TYPE_SAME_AS_PREV: u8 = 0x02;
const VALUE_TYPE_SHIFT: u8 = 2;
const VALUE_TYPE_MASK: u8 = 0x0c;
const VALUE_TYPE_SAME_AS_PREV: u8 = 0x01;
const VALUE_TYPE_AS_IS_HIRAGANA: u8 = 0x02;
const VALUE_TYPE_AS_IS_KATAKANA: u8 = 0x03;
const SMALL_COST_FLAG: u8 = 0x10;
const SPELLING_CORRECTION_FLAG: u8 = 0x20;
const LAST_TOKEN_FLAG: u8 = 0x40;
const RESERVED_FLAG: u8 = 0x80;
const TERMINATION_FLAG: u8 = 0xff;

// Character alphabets. Hiragana and katakana blocks collapse to one byte,
// the common kanji range to two; everything else is escaped.
const HIRAGANA_BEGIN: u32 = 0x3041; // ぁ
const HIRAGANA_END: u32 = 0x3096; // ゖ
const KATAKANA_BEGIN: u32 = 0x30a1; // ァ
const KATAKANA_END: u32 = 0x30f6; // ヶ
const PROLONGED_SOUND_MARK: u32 = 0x30fc; // ー
const KANJI_BEGIN: u32 = 0x4e00;
const HIRAGANA_OFFSET: u8 = 0x01;
const KEY_PROLONGED_MARK_BYTE: u8 = 0x57;
const KATAKANA_OFFSET: u8 = 0x57;
const VALUE_PROLONGED_MARK_BYTE: u8 = 0xad;
const KANJI_LEAD_BEGIN: u8 = 0xae;
const KANJI_LEAD_END: u8 = 0xfc;
const BMP_ESCAPE: u8 = 0xfe;
const WIDE_ESCAPE: u8 = 0xfd;
// Two-byte kanji covers U+4E00 ..= U+9CFF; rarer ones take the escape form.
const KANJI_TWO_BYTE_LAST: u32 =
    KANJI_BEGIN + (KANJI_LEAD_END - KANJI_LEAD_BEGIN + 1) as u32 * 256 - 1;

const MAX_VALUE_TRIE_ID: u32 = 1 << 24;

/// システム辞書符号化器のインターフェイス
///
/// ビルダーはこのトレイト越しに符号化器を借用します。既定の実装は
/// [`SystemDictionaryCodec`]です。
pub trait DictionaryCodec {
    /// 読みをキートライ用のバイト列へ符号化します。
    fn encode_key(&self, key: &str, out: &mut Vec<u8>) -> Result<()>;

    /// 表層形を値トライ用のバイト列へ符号化します。
    fn encode_value(&self, value: &str, out: &mut Vec<u8>) -> Result<()>;

    /// 1つの読みに属するソート済みトークン列を自己限定レコードへ
    /// 符号化します。
    fn encode_tokens(&self, tokens: &[TokenInfo<'_>], out: &mut Vec<u8>) -> Result<()>;

    /// トークン配列の終端センチネルを返します。
    ///
    /// この値は正当なトークンレコードの先頭バイトには現れません。
    fn tokens_termination_flag(&self) -> u8;

    /// 値トライセクションの名前
    fn section_name_for_value(&self) -> &'static str;

    /// キートライセクションの名前
    fn section_name_for_key(&self) -> &'static str;

    /// トークン配列セクションの名前
    fn section_name_for_tokens(&self) -> &'static str;

    /// 頻出品詞表セクションの名前
    fn section_name_for_pos(&self) -> &'static str;
}

/// 既定のシステム辞書符号化器
///
/// 状態を持たない純粋な関数オブジェクトです。構築ごとに1つ作成して
/// ビルダーへ渡します。
#[derive(Default)]
pub struct SystemDictionaryCodec {}

impl SystemDictionaryCodec {
    /// 新しい符号化器を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    // The value alphabet additionally collapses katakana and common kanji;
    // the key alphabet only sees readings and keeps its byte space narrow.
    fn encode_char(cp: u32, value_alphabet: bool, out: &mut Vec<u8>) {
        match cp {
            HIRAGANA_BEGIN..=HIRAGANA_END => {
                out.push(HIRAGANA_OFFSET + (cp - HIRAGANA_BEGIN) as u8);
            }
            KATAKANA_BEGIN..=KATAKANA_END if value_alphabet => {
                out.push(KATAKANA_OFFSET + (cp - KATAKANA_BEGIN) as u8);
            }
            PROLONGED_SOUND_MARK => {
                out.push(if value_alphabet {
                    VALUE_PROLONGED_MARK_BYTE
                } else {
                    KEY_PROLONGED_MARK_BYTE
                });
            }
            KANJI_BEGIN..=KANJI_TWO_BYTE_LAST if value_alphabet => {
                let d = cp - KANJI_BEGIN;
                out.push(KANJI_LEAD_BEGIN + (d / 256) as u8);
                out.push((d % 256) as u8);
            }
            _ if cp <= 0xffff => {
                out.push(BMP_ESCAPE);
                out.push((cp >> 8) as u8);
                out.push((cp & 0xff) as u8);
            }
            _ => {
                out.push(WIDE_ESCAPE);
                out.extend_from_slice(&cp.to_be_bytes());
            }
        }
    }

    fn char_from_u32(cp: u32) -> Result<char> {
        char::from_u32(cp).ok_or_else(|| {
            JitenError::invalid_format("codec", format!("invalid scalar value: U+{cp:04X}"))
        })
    }

    /// キートライ用バイト列を読みへ復号します。
    pub fn decode_key(&self, bytes: &[u8]) -> Result<String> {
        let mut out = String::new();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            i += 1;
            match b {
                HIRAGANA_OFFSET..=0x56 => {
                    out.push(Self::char_from_u32(
                        HIRAGANA_BEGIN + u32::from(b - HIRAGANA_OFFSET),
                    )?);
                }
                KEY_PROLONGED_MARK_BYTE => {
                    out.push(Self::char_from_u32(PROLONGED_SOUND_MARK)?);
                }
                BMP_ESCAPE => {
                    let cp = Self::take_bmp(bytes, &mut i)?;
                    out.push(Self::char_from_u32(cp)?);
                }
                WIDE_ESCAPE => {
                    let cp = Self::take_wide(bytes, &mut i)?;
                    out.push(Self::char_from_u32(cp)?);
                }
                _ => {
                    return Err(JitenError::invalid_format(
                        "codec",
                        format!("unexpected key byte: 0x{b:02x}"),
                    ));
                }
            }
        }
        Ok(out)
    }

    /// 値トライ用バイト列を表層形へ復号します。
    pub fn decode_value(&self, bytes: &[u8]) -> Result<String> {
        let mut out = String::new();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            i += 1;
            match b {
                HIRAGANA_OFFSET..=0x56 => {
                    out.push(Self::char_from_u32(
                        HIRAGANA_BEGIN + u32::from(b - HIRAGANA_OFFSET),
                    )?);
                }
                KATAKANA_OFFSET..=0xac => {
                    out.push(Self::char_from_u32(
                        KATAKANA_BEGIN + u32::from(b - KATAKANA_OFFSET),
                    )?);
                }
                VALUE_PROLONGED_MARK_BYTE => {
                    out.push(Self::char_from_u32(PROLONGED_SOUND_MARK)?);
                }
                KANJI_LEAD_BEGIN..=KANJI_LEAD_END => {
                    let low = *bytes.get(i).ok_or_else(|| {
                        JitenError::invalid_format("codec", "truncated kanji sequence")
                    })?;
                    i += 1;
                    let d = u32::from(b - KANJI_LEAD_BEGIN) * 256 + u32::from(low);
                    out.push(Self::char_from_u32(KANJI_BEGIN + d)?);
                }
                BMP_ESCAPE => {
                    let cp = Self::take_bmp(bytes, &mut i)?;
                    out.push(Self::char_from_u32(cp)?);
                }
                WIDE_ESCAPE => {
                    let cp = Self::take_wide(bytes, &mut i)?;
                    out.push(Self::char_from_u32(cp)?);
                }
                _ => {
                    return Err(JitenError::invalid_format(
                        "codec",
                        format!("unexpected value byte: 0x{b:02x}"),
                    ));
                }
            }
        }
        Ok(out)
    }

    fn take_bmp(bytes: &[u8], i: &mut usize) -> Result<u32> {
        if *i + 2 > bytes.len() {
            return Err(JitenError::invalid_format("codec", "truncated escape sequence"));
        }
        let cp = u32::from(bytes[*i]) << 8 | u32::from(bytes[*i + 1]);
        *i += 2;
        Ok(cp)
    }

    fn take_wide(bytes: &[u8], i: &mut usize) -> Result<u32> {
        if *i + 4 > bytes.len() {
            return Err(JitenError::invalid_format("codec", "truncated escape sequence"));
        }
        let cp = u32::from_be_bytes(bytes[*i..*i + 4].try_into().unwrap());
        *i += 4;
        Ok(cp)
    }

    /// トークンレコードを復号します。
    ///
    /// レコード末尾マーカーまで読み、解決前の形([`DecodedToken`])で
    /// 返します。品詞と値の解決には頻出品詞表・値トライ・読みが必要で、
    /// それは呼び出し側の仕事です。
    pub fn decode_tokens(&self, bytes: &[u8]) -> Result<Vec<DecodedToken>> {
        let mut out = Vec::new();
        let mut i = 0;
        loop {
            let flags = *bytes.get(i).ok_or_else(|| {
                JitenError::invalid_format("codec", "token record ends without a last-token marker")
            })?;
            i += 1;
            if flags & RESERVED_FLAG != 0 {
                return Err(JitenError::invalid_format(
                    "codec",
                    format!("illegal token flags: 0x{flags:02x}"),
                ));
            }
            let pos = match flags & POS_TYPE_MASK {
                0 => {
                    let lid = Self::take_u16(bytes, &mut i)?;
                    let rid = Self::take_u16(bytes, &mut i)?;
                    DecodedPos::Default { lid, rid }
                }
                POS_TYPE_FREQUENT => {
                    let id = *bytes.get(i).ok_or_else(|| {
                        JitenError::invalid_format("codec", "truncated frequent pos id")
                    })?;
                    i += 1;
                    DecodedPos::Frequent(id)
                }
                POS_TYPE_SAME_AS_PREV => DecodedPos::SameAsPrev,
                other => {
                    return Err(JitenError::invalid_format(
                        "codec",
                        format!("illegal pos type: {other}"),
                    ));
                }
            };
            let cost = if flags & SMALL_COST_FLAG != 0 {
                let b = *bytes.get(i).ok_or_else(|| {
                    JitenError::invalid_format("codec", "truncated small cost")
                })?;
                i += 1;
                i16::from(b) << 8
            } else {
                Self::take_u16(bytes, &mut i)? as i16
            };
            let value = match (flags & VALUE_TYPE_MASK) >> VALUE_TYPE_SHIFT {
                0 => {
                    if i + 3 > bytes.len() {
                        return Err(JitenError::invalid_format("codec", "truncated value id"));
                    }
                    let id = u32::from(bytes[i])
                        | u32::from(bytes[i + 1]) << 8
                        | u32::from(bytes[i + 2]) << 16;
                    i += 3;
                    DecodedValue::TrieId(id)
                }
                VALUE_TYPE_SAME_AS_PREV => DecodedValue::SameAsPrev,
                VALUE_TYPE_AS_IS_HIRAGANA => DecodedValue::AsIsHiragana,
                _ => DecodedValue::AsIsKatakana,
            };
            out.push(DecodedToken {
                pos,
                cost,
                value,
                spelling_correction: flags & SPELLING_CORRECTION_FLAG != 0,
            });
            if flags & LAST_TOKEN_FLAG != 0 {
                return Ok(out);
            }
        }
    }

    fn take_u16(bytes: &[u8], i: &mut usize) -> Result<u16> {
        if *i + 2 > bytes.len() {
            return Err(JitenError::invalid_format("codec", "truncated 16-bit field"));
        }
        let v = u16::from_le_bytes(bytes[*i..*i + 2].try_into().unwrap());
        *i += 2;
        Ok(v)
    }
}

impl DictionaryCodec for SystemDictionaryCodec {
    fn encode_key(&self, key: &str, out: &mut Vec<u8>) -> Result<()> {
        for c in key.chars() {
            Self::encode_char(c as u32, false, out);
        }
        Ok(())
    }

    fn encode_value(&self, value: &str, out: &mut Vec<u8>) -> Result<()> {
        for c in value.chars() {
            Self::encode_char(c as u32, true, out);
        }
        Ok(())
    }

    fn encode_tokens(&self, tokens: &[TokenInfo<'_>], out: &mut Vec<u8>) -> Result<()> {
        for (i, info) in tokens.iter().enumerate() {
            let mut flags = match info.pos_type {
                PosType::DefaultPos => 0,
                PosType::FrequentPos => POS_TYPE_FREQUENT,
                PosType::SameAsPrevPos => POS_TYPE_SAME_AS_PREV,
            };
            flags |= match info.value_type {
                ValueType::DefaultValue => 0,
                ValueType::SameAsPrevValue => VALUE_TYPE_SAME_AS_PREV << VALUE_TYPE_SHIFT,
                ValueType::AsIsHiragana => VALUE_TYPE_AS_IS_HIRAGANA << VALUE_TYPE_SHIFT,
                ValueType::AsIsKatakana => VALUE_TYPE_AS_IS_KATAKANA << VALUE_TYPE_SHIFT,
            };
            if info.cost_type == CostType::CanUseSmallEncoding {
                flags |= SMALL_COST_FLAG;
            }
            if info.token.attributes & SPELLING_CORRECTION != 0 {
                flags |= SPELLING_CORRECTION_FLAG;
            }
            if i + 1 == tokens.len() {
                flags |= LAST_TOKEN_FLAG;
            }
            out.push(flags);

            match info.pos_type {
                PosType::DefaultPos => {
                    out.extend_from_slice(&info.token.lid.to_le_bytes());
                    out.extend_from_slice(&info.token.rid.to_le_bytes());
                }
                PosType::FrequentPos => {
                    let id = info.id_in_frequent_pos_map.ok_or_else(|| {
                        JitenError::invalid_state(
                            "SystemDictionaryCodec::encode_tokens",
                            "frequent pos token without an interned id",
                        )
                    })?;
                    out.push(id);
                }
                PosType::SameAsPrevPos => {}
            }

            match info.cost_type {
                CostType::DefaultCost => {
                    out.extend_from_slice(&info.token.cost.to_le_bytes());
                }
                CostType::CanUseSmallEncoding => {
                    if info.token.cost < 0 {
                        return Err(JitenError::invalid_state(
                            "SystemDictionaryCodec::encode_tokens",
                            "small cost encoding requires a non-negative cost",
                        ));
                    }
                    out.push((info.token.cost >> 8) as u8);
                }
            }

            if info.value_type == ValueType::DefaultValue {
                let id = info.id_in_value_trie.ok_or_else(|| {
                    JitenError::invalid_state(
                        "SystemDictionaryCodec::encode_tokens",
                        "default value token without a value trie id",
                    )
                })?;
                if id >= MAX_VALUE_TRIE_ID {
                    return Err(JitenError::invalid_state(
                        "SystemDictionaryCodec::encode_tokens",
                        format!("value trie id {id} does not fit in 24 bits"),
                    ));
                }
                out.extend_from_slice(&id.to_le_bytes()[..3]);
            }
        }
        Ok(())
    }

    fn tokens_termination_flag(&self) -> u8 {
        TERMINATION_FLAG
    }

    fn section_name_for_value(&self) -> &'static str {
        "value_trie"
    }

    fn section_name_for_key(&self) -> &'static str {
        "key_trie"
    }

    fn section_name_for_tokens(&self) -> &'static str {
        "token_array"
    }

    fn section_name_for_pos(&self) -> &'static str {
        "frequent_pos"
    }
}

/// 復号されたトークンの品詞フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedPos {
    /// 左右IDがそのまま保存されていた
    Default { lid: u16, rid: u16 },
    /// 頻出品詞表のid
    Frequent(u8),
    /// 直前のトークンと同じ
    SameAsPrev,
}

/// 復号されたトークンの値フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedValue {
    /// 値トライのid
    TrieId(u32),
    /// 直前のトークンと同じ
    SameAsPrev,
    /// 読みがそのまま表層形
    AsIsHiragana,
    /// 読みのカタカナ変換が表層形
    AsIsKatakana,
}

/// 解決前の復号済みトークン
///
/// 品詞と値の参照は未解決のまま返されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    pub pos: DecodedPos,
    pub cost: i16,
    pub value: DecodedValue,
    pub spelling_correction: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Token;

    fn codec() -> SystemDictionaryCodec {
        SystemDictionaryCodec::new()
    }

    fn encode_key(s: &str) -> Vec<u8> {
        let mut out = vec![];
        codec().encode_key(s, &mut out).unwrap();
        out
    }

    fn encode_value(s: &str) -> Vec<u8> {
        let mut out = vec![];
        codec().encode_value(s, &mut out).unwrap();
        out
    }

    #[test]
    fn test_key_hiragana_single_byte() {
        let bytes = encode_key("あい");
        assert_eq!(bytes.len(), 2);
        assert_eq!(codec().decode_key(&bytes).unwrap(), "あい");
    }

    #[test]
    fn test_key_prolonged_sound_mark() {
        let bytes = encode_key("らーめん");
        assert_eq!(bytes.len(), 4);
        assert_eq!(codec().decode_key(&bytes).unwrap(), "らーめん");
    }

    #[test]
    fn test_key_escape() {
        // Katakana is not part of the key alphabet and takes the escape form.
        let bytes = encode_key("ア1");
        assert_eq!(bytes.len(), 6);
        assert_eq!(codec().decode_key(&bytes).unwrap(), "ア1");
    }

    #[test]
    fn test_value_katakana_single_byte() {
        let bytes = encode_value("アイー");
        assert_eq!(bytes.len(), 3);
        assert_eq!(codec().decode_value(&bytes).unwrap(), "アイー");
    }

    #[test]
    fn test_value_kanji_two_bytes() {
        let bytes = encode_value("愛");
        assert_eq!(bytes.len(), 2);
        assert_eq!(codec().decode_value(&bytes).unwrap(), "愛");
    }

    #[test]
    fn test_value_mixed_roundtrip() {
        for s in ["東京都", "すし屋", "Rust言語", "絵文字😀", "髙"] {
            let bytes = encode_value(s);
            assert_eq!(codec().decode_value(&bytes).unwrap(), s, "{s}");
        }
    }

    #[test]
    fn test_value_rare_kanji_escape() {
        // U+9D00 is just past the two-byte range.
        let s = "\u{9d00}";
        let bytes = encode_value(s);
        assert_eq!(bytes[0], BMP_ESCAPE);
        assert_eq!(codec().decode_value(&bytes).unwrap(), s);
    }

    #[test]
    fn test_decode_key_rejects_value_bytes() {
        assert!(codec().decode_key(&[KATAKANA_OFFSET + 1]).is_err());
    }

    fn info<'a>(token: &'a Token) -> TokenInfo<'a> {
        let mut info = TokenInfo::new(token);
        info.id_in_value_trie = Some(0);
        info
    }

    #[test]
    fn test_tokens_default_roundtrip() {
        let t1 = Token::new("あい", "愛", 10, 20, 500);
        let t2 = Token::new("あい", "藍", 10, 20, -300);
        let mut i1 = info(&t1);
        i1.id_in_value_trie = Some(7);
        let mut i2 = info(&t2);
        i2.id_in_value_trie = Some(300000);
        i2.pos_type = PosType::SameAsPrevPos;
        let mut bytes = vec![];
        codec().encode_tokens(&[i1, i2], &mut bytes).unwrap();

        let decoded = codec().decode_tokens(&bytes).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].pos, DecodedPos::Default { lid: 10, rid: 20 });
        assert_eq!(decoded[0].cost, 500);
        assert_eq!(decoded[0].value, DecodedValue::TrieId(7));
        assert_eq!(decoded[1].pos, DecodedPos::SameAsPrev);
        assert_eq!(decoded[1].cost, -300);
        assert_eq!(decoded[1].value, DecodedValue::TrieId(300000));
    }

    #[test]
    fn test_tokens_compact_forms() {
        let t = Token::new("あいうえおか", "あいうえおか", 1, 1, 0x1200);
        let mut i = TokenInfo::new(&t);
        i.value_type = ValueType::AsIsHiragana;
        i.pos_type = PosType::FrequentPos;
        i.id_in_frequent_pos_map = Some(42);
        i.cost_type = CostType::CanUseSmallEncoding;
        let mut bytes = vec![];
        codec().encode_tokens(&[i], &mut bytes).unwrap();
        // flags + frequent pos id + small cost.
        assert_eq!(bytes.len(), 3);

        let decoded = codec().decode_tokens(&bytes).unwrap();
        assert_eq!(decoded[0].pos, DecodedPos::Frequent(42));
        assert_eq!(decoded[0].cost, 0x1200);
        assert_eq!(decoded[0].value, DecodedValue::AsIsHiragana);
    }

    #[test]
    fn test_tokens_spelling_correction_flag() {
        let mut t = Token::new("あい", "アイ", 3, 4, 10);
        t.attributes = SPELLING_CORRECTION;
        let mut i = TokenInfo::new(&t);
        i.value_type = ValueType::AsIsKatakana;
        let mut bytes = vec![];
        codec().encode_tokens(&[i], &mut bytes).unwrap();
        let decoded = codec().decode_tokens(&bytes).unwrap();
        assert!(decoded[0].spelling_correction);
        assert_eq!(decoded[0].value, DecodedValue::AsIsKatakana);
    }

    #[test]
    fn test_termination_flag_never_opens_a_record() {
        let t = Token::new("あ", "亜", u16::MAX, u16::MAX, i16::MIN);
        let mut i = info(&t);
        i.cost_type = CostType::DefaultCost;
        let mut bytes = vec![];
        codec().encode_tokens(&[i], &mut bytes).unwrap();
        assert_ne!(bytes[0], codec().tokens_termination_flag());
        assert_eq!(bytes[0] & RESERVED_FLAG, 0);
    }

    #[test]
    fn test_decode_rejects_termination_flag() {
        assert!(codec().decode_tokens(&[TERMINATION_FLAG]).is_err());
    }

    #[test]
    fn test_small_cost_rejects_negative() {
        let t = Token::new("あ", "亜", 1, 1, -1);
        let mut i = info(&t);
        i.cost_type = CostType::CanUseSmallEncoding;
        let mut bytes = vec![];
        assert!(codec().encode_tokens(&[i], &mut bytes).is_err());
    }

    #[test]
    fn test_value_id_must_fit_24_bits() {
        let t = Token::new("あ", "亜", 1, 1, 0);
        let mut i = info(&t);
        i.id_in_value_trie = Some(MAX_VALUE_TRIE_ID);
        let mut bytes = vec![];
        assert!(codec().encode_tokens(&[i], &mut bytes).is_err());
    }
}
