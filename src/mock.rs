//! In-memory engine for tests and host binding development.
//!
//! `MockEngine` implements [`Engine`] over a tree of [`TypeSpec`]s. It keeps
//! count of every handle and string it hands out, so callers can check that
//! everything was released, and it can be told to panic on a later
//! allocation to exercise unwinding paths.
//!
//! Misused accessors behave like the native engine does for them: a child
//! lookup on a type without that child returns an INVALID handle, and
//! numeric accessors return zero.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::engine::Engine;
use crate::types::TypeId;

/// Shape of a logical type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    /// Any type without parameters, by raw code. Codes need not be known.
    Primitive(i32),
    Decimal { width: u8, scale: u8 },
    List(Box<TypeSpec>),
    Array(Box<TypeSpec>, u64),
    Struct(Vec<(String, TypeSpec)>),
    Map(Box<TypeSpec>, Box<TypeSpec>),
    Union(Vec<(String, TypeSpec)>),
}

impl TypeSpec {
    pub fn of(type_id: TypeId) -> Self {
        TypeSpec::Primitive(type_id.code())
    }

    pub fn decimal(width: u8, scale: u8) -> Self {
        TypeSpec::Decimal { width, scale }
    }

    pub fn list(child: TypeSpec) -> Self {
        TypeSpec::List(Box::new(child))
    }

    pub fn array(child: TypeSpec, size: u64) -> Self {
        TypeSpec::Array(Box::new(child), size)
    }

    pub fn structure<'a>(fields: impl IntoIterator<Item = (&'a str, TypeSpec)>) -> Self {
        TypeSpec::Struct(named(fields))
    }

    pub fn map(key: TypeSpec, value: TypeSpec) -> Self {
        TypeSpec::Map(Box::new(key), Box::new(value))
    }

    pub fn union<'a>(members: impl IntoIterator<Item = (&'a str, TypeSpec)>) -> Self {
        TypeSpec::Union(named(members))
    }

    /// Raw type code.
    pub fn code(&self) -> i32 {
        match self {
            TypeSpec::Primitive(code) => *code,
            TypeSpec::Decimal { .. } => TypeId::Decimal.code(),
            TypeSpec::List(_) => TypeId::List.code(),
            TypeSpec::Array(..) => TypeId::Array.code(),
            TypeSpec::Struct(_) => TypeId::Struct.code(),
            TypeSpec::Map(..) => TypeId::Map.code(),
            TypeSpec::Union(_) => TypeId::Union.code(),
        }
    }
}

fn named<'a>(fields: impl IntoIterator<Item = (&'a str, TypeSpec)>) -> Vec<(String, TypeSpec)> {
    fields
        .into_iter()
        .map(|(name, spec)| (name.to_string(), spec))
        .collect()
}

fn invalid() -> TypeSpec {
    TypeSpec::of(TypeId::Invalid)
}

/// Logical type handle issued by [`MockEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockHandle(u64);

/// String issued by [`MockEngine`].
#[derive(Debug, PartialEq, Eq)]
pub struct MockString(u64);

#[derive(Debug, Clone)]
struct MockColumn {
    name: String,
    code: i32,
    logical: Option<TypeSpec>,
}

/// Result of a query against [`MockEngine`].
#[derive(Debug, Clone, Default)]
pub struct MockResult {
    columns: Vec<MockColumn>,
    destroyed: bool,
}

impl MockResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column with a logical type.
    pub fn with_column(mut self, name: &str, spec: TypeSpec) -> Self {
        self.columns.push(MockColumn {
            name: name.to_string(),
            code: spec.code(),
            logical: Some(spec),
        });
        self
    }

    /// Add a column the engine reports no logical type for.
    pub fn with_opaque_column(mut self, name: &str, code: i32) -> Self {
        self.columns.push(MockColumn {
            name: name.to_string(),
            code,
            logical: None,
        });
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn column(&self, col: u64) -> &MockColumn {
        assert!(!self.destroyed, "use of destroyed result");
        usize::try_from(col)
            .ok()
            .and_then(|i| self.columns.get(i))
            .unwrap_or_else(|| panic!("column index {} out of range", col))
    }
}

/// In-memory [`Engine`] with allocation tracking and fault injection.
#[derive(Debug, Default)]
pub struct MockEngine {
    next_id: Cell<u64>,
    handles: RefCell<HashMap<u64, Rc<TypeSpec>>>,
    strings: RefCell<HashMap<u64, String>>,
    handles_allocated: Cell<usize>,
    handles_released: Cell<usize>,
    results_destroyed: Cell<usize>,
    fault_after: Cell<Option<usize>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a handle for `spec`. The caller owns it.
    pub fn alloc_type(&self, spec: TypeSpec) -> MockHandle {
        self.check_fault();
        let id = self.next_id();
        self.handles.borrow_mut().insert(id, Rc::new(spec));
        self.handles_allocated.set(self.handles_allocated.get() + 1);
        MockHandle(id)
    }

    /// Panic on the allocation after the next `allocations` handles or strings.
    pub fn fail_after(&self, allocations: usize) {
        self.fault_after.set(Some(allocations));
    }

    pub fn clear_fault(&self) {
        self.fault_after.set(None);
    }

    /// Handles allocated and not yet released.
    pub fn live_handles(&self) -> usize {
        self.handles.borrow().len()
    }

    /// Strings allocated and not yet freed.
    pub fn live_strings(&self) -> usize {
        self.strings.borrow().len()
    }

    pub fn handles_allocated(&self) -> usize {
        self.handles_allocated.get()
    }

    pub fn handles_released(&self) -> usize {
        self.handles_released.get()
    }

    pub fn results_destroyed(&self) -> usize {
        self.results_destroyed.get()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn check_fault(&self) {
        match self.fault_after.get() {
            Some(0) => {
                self.fault_after.set(None);
                panic!("injected engine fault");
            }
            Some(n) => self.fault_after.set(Some(n - 1)),
            None => {}
        }
    }

    fn spec(&self, handle: MockHandle) -> Rc<TypeSpec> {
        match self.handles.borrow().get(&handle.0) {
            Some(spec) => Rc::clone(spec),
            None => panic!("use of released logical type handle {:?}", handle),
        }
    }

    fn alloc_string(&self, value: &str) -> MockString {
        self.check_fault();
        let id = self.next_id();
        self.strings.borrow_mut().insert(id, value.to_string());
        MockString(id)
    }

    fn field(&self, fields: &[(String, TypeSpec)], index: u64) -> Option<(String, TypeSpec)> {
        usize::try_from(index)
            .ok()
            .and_then(|i| fields.get(i))
            .cloned()
    }

    fn named_child(&self, handle: MockHandle, index: u64) -> Option<(String, TypeSpec)> {
        match &*self.spec(handle) {
            TypeSpec::Struct(fields) | TypeSpec::Union(fields) => self.field(fields, index),
            _ => None,
        }
    }
}

impl Engine for MockEngine {
    type Result = MockResult;
    type LogicalType = MockHandle;
    type String = MockString;

    fn column_count(&self, result: &MockResult) -> u64 {
        result.columns.len() as u64
    }

    fn column_type(&self, result: &MockResult, col: u64) -> i32 {
        result.column(col).code
    }

    fn column_logical_type(&self, result: &MockResult, col: u64) -> Option<MockHandle> {
        let spec = result.column(col).logical.clone()?;
        Some(self.alloc_type(spec))
    }

    fn column_name<'r>(&self, result: &'r MockResult, col: u64) -> Cow<'r, str> {
        Cow::Borrowed(&result.column(col).name)
    }

    fn destroy_result(&self, result: &mut MockResult) {
        assert!(!result.destroyed, "result destroyed twice");
        result.destroyed = true;
        self.results_destroyed.set(self.results_destroyed.get() + 1);
    }

    fn type_id(&self, ty: MockHandle) -> i32 {
        self.spec(ty).code()
    }

    fn decimal_width(&self, ty: MockHandle) -> u8 {
        match &*self.spec(ty) {
            TypeSpec::Decimal { width, .. } => *width,
            _ => 0,
        }
    }

    fn decimal_scale(&self, ty: MockHandle) -> u8 {
        match &*self.spec(ty) {
            TypeSpec::Decimal { scale, .. } => *scale,
            _ => 0,
        }
    }

    fn list_child_type(&self, ty: MockHandle) -> MockHandle {
        let child = match &*self.spec(ty) {
            TypeSpec::List(child) => (**child).clone(),
            TypeSpec::Map(key, value) => TypeSpec::structure([
                ("key", (**key).clone()),
                ("value", (**value).clone()),
            ]),
            _ => invalid(),
        };
        self.alloc_type(child)
    }

    fn array_child_type(&self, ty: MockHandle) -> MockHandle {
        let child = match &*self.spec(ty) {
            TypeSpec::Array(child, _) => (**child).clone(),
            _ => invalid(),
        };
        self.alloc_type(child)
    }

    fn array_size(&self, ty: MockHandle) -> u64 {
        match &*self.spec(ty) {
            TypeSpec::Array(_, size) => *size,
            _ => 0,
        }
    }

    fn struct_child_count(&self, ty: MockHandle) -> u64 {
        match &*self.spec(ty) {
            TypeSpec::Struct(fields) => fields.len() as u64,
            _ => 0,
        }
    }

    fn struct_child_name(&self, ty: MockHandle, index: u64) -> MockString {
        let name = self.named_child(ty, index).map(|(name, _)| name);
        self.alloc_string(name.as_deref().unwrap_or(""))
    }

    fn struct_child_type(&self, ty: MockHandle, index: u64) -> MockHandle {
        let spec = self.named_child(ty, index).map(|(_, spec)| spec);
        self.alloc_type(spec.unwrap_or_else(invalid))
    }

    fn map_key_type(&self, ty: MockHandle) -> MockHandle {
        let key = match &*self.spec(ty) {
            TypeSpec::Map(key, _) => (**key).clone(),
            _ => invalid(),
        };
        self.alloc_type(key)
    }

    fn map_value_type(&self, ty: MockHandle) -> MockHandle {
        let value = match &*self.spec(ty) {
            TypeSpec::Map(_, value) => (**value).clone(),
            _ => invalid(),
        };
        self.alloc_type(value)
    }

    fn union_member_count(&self, ty: MockHandle) -> u64 {
        match &*self.spec(ty) {
            TypeSpec::Union(members) => members.len() as u64,
            _ => 0,
        }
    }

    fn union_member_name(&self, ty: MockHandle, index: u64) -> MockString {
        self.struct_child_name(ty, index)
    }

    fn union_member_type(&self, ty: MockHandle, index: u64) -> MockHandle {
        self.struct_child_type(ty, index)
    }

    fn destroy_logical_type(&self, ty: MockHandle) {
        if self.handles.borrow_mut().remove(&ty.0).is_none() {
            panic!("logical type handle {:?} released twice", ty);
        }
        self.handles_released.set(self.handles_released.get() + 1);
    }

    fn string_as_str<'s>(&self, s: &'s MockString) -> Cow<'s, str> {
        match self.strings.borrow().get(&s.0) {
            Some(value) => Cow::Owned(value.clone()),
            None => panic!("use of freed string {:?}", s),
        }
    }

    fn free_string(&self, s: MockString) {
        if self.strings.borrow_mut().remove(&s.0).is_none() {
            panic!("string {:?} freed twice", s);
        }
    }
}
