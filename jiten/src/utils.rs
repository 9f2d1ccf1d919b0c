//! かな文字の変換ユーティリティ
//!
//! 読み(ひらがな)と表層形(カタカナ)の対応付けに使う、コードポイント単位の
//! 変換関数を提供します。

/// ひらがなをカタカナに変換します
///
/// ぁ(U+3041)〜ゖ(U+3096)およびゝゞ(U+309D/U+309E)を、対応するカタカナに
/// コードポイント単位で写します。それ以外の文字は変更されません。
///
/// # 引数
///
/// * `src` - 変換元の文字列
///
/// # 戻り値
///
/// 変換後の文字列
///
/// # 例
///
/// ```
/// # use jiten::utils::hiragana_to_katakana;
/// assert_eq!(hiragana_to_katakana("あい"), "アイ");
/// assert_eq!(hiragana_to_katakana("らーめん"), "ラーメン");
/// ```
pub fn hiragana_to_katakana(src: &str) -> String {
    src.chars()
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' | '\u{309D}' | '\u{309E}' => {
                // The katakana block sits 0x60 code points above hiragana.
                char::from_u32(c as u32 + 0x60).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// 文字列の長さを文字数(コードポイント数)で返します
///
/// 読み長の閾値判定はバイト数ではなく文字数で行います。
///
/// # 例
///
/// ```
/// # use jiten::utils::char_count;
/// assert_eq!(char_count("あいうえおか"), 6);
/// assert_eq!(char_count("らーめん"), 4);
/// ```
#[inline]
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// カタカナをひらがなに変換します
///
/// [`hiragana_to_katakana`]の逆写像です。ァ(U+30A1)〜ヶ(U+30F6)および
/// ヽヾ(U+30FD/U+30FE)が対象です。
pub fn katakana_to_hiragana(src: &str) -> String {
    src.chars()
        .map(|c| match c {
            '\u{30A1}'..='\u{30F6}' | '\u{30FD}' | '\u{30FE}' => {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}
