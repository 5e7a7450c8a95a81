//! 上传文件首块的魔术字节校验

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
const PDF: &[u8] = b"%PDF";
/// OLE 复合文档（doc/ppt/xls 旧格式）
const OLE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
/// zip 容器，OOXML 也是 zip
const ZIP: &[u8] = &[b'P', b'K', 0x03, 0x04];

/// 纯文本类扩展名不做签名检查，只拒绝包含 NUL 的内容
const TEXT_EXTENSIONS: &[&str] = &[".txt", ".md", ".csv", ".json"];

/// `extension` 含点号，大小写不敏感；未知扩展名一律拒绝
pub fn validate_magic_bytes(head: &[u8], extension: &str) -> bool {
    if head.is_empty() {
        return false;
    }

    let ext = extension.to_ascii_lowercase();
    if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        return !head.contains(&0);
    }

    let signature: &[u8] = match ext.as_str() {
        ".png" => PNG,
        ".jpg" | ".jpeg" => JPEG,
        ".gif" => return head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a"),
        ".webp" => return head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == b"WEBP",
        ".pdf" => PDF,
        ".doc" | ".ppt" | ".xls" => OLE,
        ".docx" | ".pptx" | ".xlsx" | ".zip" => ZIP,
        _ => return false,
    };
    head.starts_with(signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signatures() {
        assert!(validate_magic_bytes(b"%PDF-1.7\n", ".pdf"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE1], ".JPG"));
        assert!(validate_magic_bytes(b"PK\x03\x04rest", ".docx"));
        assert!(validate_magic_bytes(b"PK\x03\x04rest", ".zip"));
    }

    #[test]
    fn test_mismatch_rejected() {
        assert!(!validate_magic_bytes(b"%PDF-1.7", ".png"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".pdf"));
    }

    #[test]
    fn test_text_files() {
        assert!(validate_magic_bytes(b"lecture notes", ".txt"));
        assert!(!validate_magic_bytes(b"bin\0ary", ".txt"));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".txt"));
        assert!(!validate_magic_bytes(b"anything", ".exe"));
    }
}
