//! Jitenのテストモジュール群
//!
//! ビルダーの端から端までのシナリオと、出力イメージの復号による
//! 検証を含みます。
