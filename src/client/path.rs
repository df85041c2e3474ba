/// Join a URL path with a request path, `/`-separated, and clean the result.
///
/// Empty and `.` segments are dropped, `..` removes the previous segment (but
/// never climbs above the root), and the result is always rooted with no
/// trailing separator. Segments are not URL-decoded: a `?` or `#` inside
/// `path` is treated as part of a segment, not as a query or fragment.
pub fn join_path(base: &str, path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}
