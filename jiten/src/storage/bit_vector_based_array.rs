//! ビットベクタ索引付き可変長レコード配列
//!
//! このモジュールは、可変長バイトレコードの列を連結blobと境界ビットベクタに
//! 符号化するビルダーと、その読み取り側を提供します。
//!
//! # イメージレイアウト
//!
//! ```text
//! [境界ビットベクタのバイト長: u32 LE]
//! [境界ビットベクタ (4バイト詰め)]
//! [連結レコードバイト列]
//! ```
//!
//! 境界ビットベクタはデータ1バイトにつき1ビットで、レコードが始まる
//! 位置だけが1になります。長さ0のレコードは0x00の詰めバイト1つとして
//! 格納され、すべての開始位置が相異なることを保証します。i番目の
//! レコードのオフセットは`select1(i)`で求まります。

use crate::errors::{JitenError, Result};
use crate::storage::bit_vector::{BitVector, BitVectorBuilder};

/// 可変長レコード配列を構築するビルダー
///
/// [`add()`](Self::add)の順序は保存されます。[`build()`](Self::build)で
/// イメージへ確定します。
#[derive(Default)]
pub struct BitVectorBasedArrayBuilder {
    elements: Vec<Vec<u8>>,
    image: Vec<u8>,
    built: bool,
}

impl BitVectorBasedArrayBuilder {
    /// 新しいビルダーを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// レコードを1つ追記します。
    ///
    /// # エラー
    ///
    /// [`build()`](Self::build)後に呼んだ場合にエラーを返します。
    pub fn add(&mut self, element: &[u8]) -> Result<()> {
        if self.built {
            return Err(JitenError::invalid_state(
                "BitVectorBasedArrayBuilder::add",
                "the array is already built",
            ));
        }
        self.elements.push(element.to_vec());
        Ok(())
    }

    /// 配列を確定します。これ以降の[`add()`](Self::add)はできません。
    pub fn build(&mut self) -> Result<()> {
        if self.built {
            return Err(JitenError::invalid_state(
                "BitVectorBasedArrayBuilder::build",
                "the array is already built",
            ));
        }
        let mut boundary = BitVectorBuilder::new();
        let mut data = Vec::new();
        for element in &self.elements {
            boundary.push_bit(true);
            if element.is_empty() {
                // Keep record starts distinct; the padding byte is inert
                // because records are self-delimited.
                data.push(0);
                continue;
            }
            for _ in 1..element.len() {
                boundary.push_bit(false);
            }
            data.extend_from_slice(element);
        }
        let boundary_bytes = boundary.into_bytes();
        self.image = Vec::with_capacity(4 + boundary_bytes.len() + data.len());
        self.image
            .extend_from_slice(&(boundary_bytes.len() as u32).to_le_bytes());
        self.image.extend_from_slice(&boundary_bytes);
        self.image.extend_from_slice(&data);
        self.elements.clear();
        self.built = true;
        Ok(())
    }

    /// 確定済み配列のイメージを返します。未確定なら空です。
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// 確定済みかどうかを返します。
    pub fn is_built(&self) -> bool {
        self.built
    }
}

/// 可変長レコード配列の読み取り側
pub struct BitVectorBasedArray<'a> {
    boundary: BitVector<'a>,
    data: &'a [u8],
}

impl<'a> BitVectorBasedArray<'a> {
    /// イメージから配列を開きます。
    ///
    /// # エラー
    ///
    /// ヘッダ長が不正な場合にエラーを返します。
    pub fn from_image(image: &'a [u8]) -> Result<Self> {
        if image.len() < 4 {
            return Err(JitenError::invalid_format(
                "bit_vector_based_array",
                "image is shorter than the header",
            ));
        }
        let boundary_len = u32::from_le_bytes(image[..4].try_into().unwrap()) as usize;
        if 4 + boundary_len > image.len() {
            return Err(JitenError::invalid_format(
                "bit_vector_based_array",
                "boundary vector length exceeds the image size",
            ));
        }
        Ok(Self {
            boundary: BitVector::new(&image[4..4 + boundary_len]),
            data: &image[4 + boundary_len..],
        })
    }

    /// レコード数を返します。
    pub fn len(&self) -> usize {
        self.boundary.num_ones()
    }

    /// レコードが存在しないかどうかを返します。
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// i番目のレコードのバイト列を返します。
    ///
    /// 長さ0で格納されたレコードは詰めバイトを含むビューになりますが、
    /// レコードは自己限定的なため復号には影響しません。
    pub fn get(&self, i: usize) -> Option<&'a [u8]> {
        let begin = self.boundary.select1(i)?;
        let end = match self.boundary.select1(i + 1) {
            Some(pos) => pos,
            None => self.data.len(),
        };
        self.data.get(begin..end)
    }
}
