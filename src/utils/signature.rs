// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 签名请求头
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";
/// 时间戳请求头
pub const TIMESTAMP_HEADER: &str = "X-Webhook-Timestamp";
/// 事件名请求头
pub const EVENT_HEADER: &str = "X-Webhook-Event";

/// 对负载正文签名
///
/// 返回以 `secret` 为密钥、对 `body` 原始字节计算的 HMAC-SHA256 十六进制串
pub fn sign(secret: &str, body: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// 校验签名
///
/// 订阅方用收到的原始正文和自己的密钥重新计算并以常量时间比较
pub fn verify(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// 生成新的签名密钥（32个随机字节的十六进制）
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
