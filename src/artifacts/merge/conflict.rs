use bytes::Bytes;

const CURRENT_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const SEPARATOR_MARKER: &[u8] = b"=======\n";
const GIVEN_MARKER: &[u8] = b">>>>>>>\n";

/// Contents written in place of a conflicted file
///
/// Each side is inserted verbatim; a side that deleted the file contributes
/// nothing. No newline is added after a side's content.
pub fn conflict_marker(current: Option<&[u8]>, given: Option<&[u8]>) -> Bytes {
    let current = current.unwrap_or_default();
    let given = given.unwrap_or_default();

    let mut content = Vec::with_capacity(
        CURRENT_MARKER.len()
            + current.len()
            + SEPARATOR_MARKER.len()
            + given.len()
            + GIVEN_MARKER.len(),
    );
    content.extend_from_slice(CURRENT_MARKER);
    content.extend_from_slice(current);
    content.extend_from_slice(SEPARATOR_MARKER);
    content.extend_from_slice(given);
    content.extend_from_slice(GIVEN_MARKER);

    content.into()
}
