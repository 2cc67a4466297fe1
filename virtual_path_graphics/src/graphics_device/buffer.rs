/// Buffer binding targets and usage hints

/// Binding target of a GPU buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data (GL_ARRAY_BUFFER)
    Vertex,
    /// Element indices (GL_ELEMENT_ARRAY_BUFFER), captured by the bound vertex array
    Index,
    /// Uniform block storage (GL_UNIFORM_BUFFER)
    Uniform,
}

/// Expected update frequency of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once, drawn many times
    Static,
    /// Rewritten frequently
    Dynamic,
}
