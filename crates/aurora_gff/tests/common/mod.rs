//! Lays out GFF images in memory for the integration tests.

#![allow(dead_code)]

/// A value to store in a field
#[derive(Debug, Clone)]
pub enum Value {
    Byte(u8),
    Char(i8),
    Uint16(u16),
    Sint16(i16),
    Uint32(u32),
    Sint32(i32),
    Uint64(u64),
    Sint64(i64),
    Float(f32),
    Double(f64),
    ExoString(String),
    ResRef(String),
    /// String reference and `(id, text)` pairs
    LocString(u32, Vec<(u32, String)>),
    Void(Vec<u8>),
    Struct(Node),
    List(Vec<Node>),
    Orientation([f32; 4]),
    Vector([f32; 3]),
    /// A raw type tag and data word, stored as is
    Raw(u32, u32),
}

/// A struct to lay out
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub id: u32,
    pub fields: Vec<(String, Value)>,
}

impl Node {
    pub fn new(id: u32) -> Self {
        Node {
            id,
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, label: &str, value: Value) -> Self {
        self.fields.push((label.to_owned(), value));
        self
    }
}

/// Offsets of the tables inside a built image
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout {
    pub list_indices_offset: usize,
    pub field_data_offset: usize,
    pub field_data_count: usize,
}

#[derive(Default)]
struct Builder {
    structs: Vec<(u32, Vec<u32>)>,
    fields: Vec<[u32; 3]>,
    labels: Vec<String>,
    field_data: Vec<u8>,
    list_indices: Vec<u32>,
}

impl Builder {
    fn label(&mut self, label: &str) -> u32 {
        match self.labels.iter().position(|l| l == label) {
            Some(i) => i as u32,
            None => {
                self.labels.push(label.to_owned());
                self.labels.len() as u32 - 1
            }
        }
    }

    fn data(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.field_data.len() as u32;
        self.field_data.extend_from_slice(bytes);
        offset
    }

    fn add_struct(&mut self, node: &Node) -> u32 {
        let index = self.structs.len();
        self.structs.push((node.id, Vec::new()));

        let mut field_ids = Vec::new();
        for (label, value) in &node.fields {
            let (tag, data) = self.add_value(value);
            let label = self.label(label);
            field_ids.push(self.fields.len() as u32);
            self.fields.push([tag, label, data]);
        }

        self.structs[index].1 = field_ids;
        index as u32
    }

    fn add_value(&mut self, value: &Value) -> (u32, u32) {
        match value {
            Value::Byte(v) => (0, *v as u32),
            Value::Char(v) => (1, *v as u8 as u32),
            Value::Uint16(v) => (2, *v as u32),
            Value::Sint16(v) => (3, *v as u16 as u32),
            Value::Uint32(v) => (4, *v),
            Value::Sint32(v) => (5, *v as u32),
            Value::Uint64(v) => (6, self.data(&v.to_le_bytes())),
            Value::Sint64(v) => (7, self.data(&v.to_le_bytes())),
            Value::Float(v) => (8, v.to_bits()),
            Value::Double(v) => (9, self.data(&v.to_le_bytes())),
            Value::ExoString(s) => {
                let mut bytes = (s.len() as u32).to_le_bytes().to_vec();
                bytes.extend_from_slice(s.as_bytes());
                (10, self.data(&bytes))
            }
            Value::ResRef(s) => {
                let mut bytes = vec![s.len() as u8];
                bytes.extend_from_slice(s.as_bytes());
                (11, self.data(&bytes))
            }
            Value::LocString(string_ref, strings) => {
                let mut body = string_ref.to_le_bytes().to_vec();
                body.extend_from_slice(&(strings.len() as u32).to_le_bytes());
                for (id, text) in strings {
                    body.extend_from_slice(&id.to_le_bytes());
                    body.extend_from_slice(&(text.len() as u32).to_le_bytes());
                    body.extend_from_slice(text.as_bytes());
                }
                let mut bytes = (body.len() as u32).to_le_bytes().to_vec();
                bytes.extend_from_slice(&body);
                (12, self.data(&bytes))
            }
            Value::Void(v) => {
                let mut bytes = (v.len() as u32).to_le_bytes().to_vec();
                bytes.extend_from_slice(v);
                (13, self.data(&bytes))
            }
            Value::Struct(node) => (14, self.add_struct(node)),
            Value::List(nodes) => {
                // Reserve the whole run first so nested lists land after it
                let position = self.list_indices.len();
                self.list_indices.push(nodes.len() as u32);
                self.list_indices
                    .extend(std::iter::repeat(0).take(nodes.len()));

                for (i, node) in nodes.iter().enumerate() {
                    let index = self.add_struct(node);
                    self.list_indices[position + 1 + i] = index;
                }
                (15, position as u32 * 4)
            }
            Value::Orientation(v) => {
                let bytes: Vec<u8> = v.iter().flat_map(|f| f.to_le_bytes()).collect();
                (16, self.data(&bytes))
            }
            Value::Vector(v) => {
                let bytes: Vec<u8> = v.iter().flat_map(|f| f.to_le_bytes()).collect();
                (17, self.data(&bytes))
            }
            Value::Raw(tag, data) => (*tag, *data),
        }
    }
}

fn words(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Lay out a GFF image with `root` as its top level struct.
///
/// Tables are written in the order structs, fields, labels, field indices, list indices and
/// field data, so truncating the image cuts into the field data first.
pub fn build(file_type: &[u8; 4], version: &[u8; 4], root: &Node) -> (Vec<u8>, Layout) {
    let mut builder = Builder::default();
    builder.add_struct(root);

    let mut field_indices = Vec::new();
    let mut struct_table = Vec::new();
    for (id, fields) in &builder.structs {
        let index = match fields.len() {
            0 => 0,
            1 => fields[0],
            _ => {
                let offset = field_indices.len() as u32 * 4;
                field_indices.extend_from_slice(fields);
                offset
            }
        };
        struct_table.extend_from_slice(&[*id, index, fields.len() as u32]);
    }

    let field_table: Vec<u32> = builder.fields.iter().flatten().copied().collect();
    let label_table: Vec<u8> = builder
        .labels
        .iter()
        .flat_map(|l| {
            let mut raw = l.as_bytes().to_vec();
            raw.resize(16, 0);
            raw
        })
        .collect();

    let struct_offset = 56;
    let field_offset = struct_offset + struct_table.len() * 4;
    let label_offset = field_offset + field_table.len() * 4;
    let field_indices_offset = label_offset + label_table.len();
    let list_indices_offset = field_indices_offset + field_indices.len() * 4;
    let field_data_offset = list_indices_offset + builder.list_indices.len() * 4;

    let header = [
        struct_offset,
        builder.structs.len(),
        field_offset,
        builder.fields.len(),
        label_offset,
        builder.labels.len(),
        field_data_offset,
        builder.field_data.len(),
        field_indices_offset,
        field_indices.len() * 4,
        list_indices_offset,
        builder.list_indices.len() * 4,
    ]
    .map(|v| v as u32);

    let mut image = Vec::new();
    image.extend_from_slice(file_type);
    image.extend_from_slice(version);
    image.extend(words(&header));
    image.extend(words(&struct_table));
    image.extend(words(&field_table));
    image.extend(label_table);
    image.extend(words(&field_indices));
    image.extend(words(&builder.list_indices));
    image.extend_from_slice(&builder.field_data);

    let layout = Layout {
        list_indices_offset,
        field_data_offset,
        field_data_count: builder.field_data.len(),
    };

    (image, layout)
}

/// Overwrite a little endian word inside an image
pub fn patch_word(image: &mut [u8], offset: usize, value: u32) {
    image[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
