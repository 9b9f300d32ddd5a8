//! The script-facing side of [`Matrix`]: members, operators and tracing.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

use mtx_host::{
    expect_args, ForeignObject, ForeignRef, Host, HostError, HostResult, MemberTable, Value,
};

use crate::error::{MatrixError, MatrixResult};
use crate::matrix::Matrix;

impl Matrix {
    /// Registers this matrix with the host collector.
    pub fn into_value(self, host: &mut dyn Host) -> Value {
        let object: ForeignRef = Rc::new(RefCell::new(self));
        host.add_foreign_object(object)
    }
}

/// Resolves `operand` to a matrix and runs `f` on it.
fn with_operand<R>(
    operand: &Value,
    host: &mut dyn Host,
    f: impl FnOnce(&Matrix, &mut dyn Host) -> MatrixResult<R>,
) -> MatrixResult<R> {
    if operand.as_foreign().is_none() {
        return Err(MatrixError::TypeMismatch);
    }
    let object = host.foreign_object(operand)?;
    let object = object
        .try_borrow()
        .map_err(|_| HostError::internal("matrix is already in use"))?;
    let matrix = object
        .as_any()
        .downcast_ref::<Matrix>()
        .ok_or(MatrixError::TypeMismatch)?;
    f(matrix, host)
}

fn size_value(n: usize, host: &mut dyn Host) -> HostResult<Value> {
    let n = i64::try_from(n)
        .map_err(|_| HostError::internal(format!("{n} does not fit in a script integer")))?;
    Ok(host.integer(n))
}

fn members() -> &'static MemberTable<Matrix> {
    static MEMBERS: OnceLock<MemberTable<Matrix>> = OnceLock::new();
    MEMBERS.get_or_init(|| {
        MemberTable::<Matrix>::new()
            .getter("rows", |m, host| size_value(m.rows(), host))
            .getter("cols", |m, host| size_value(m.cols(), host))
            .getter("size", |m, host| size_value(m.len(), host))
            .method("get", |m, args, host| {
                expect_args("get", &args, 2)?;
                let (row, col) = (host.size(&args[0])?, host.size(&args[1])?);
                Ok(m.get(row, col)?.clone())
            })
            .method("set", |m, mut args, host| {
                expect_args("set", &args, 3)?;
                let (row, col) = (host.size(&args[0])?, host.size(&args[1])?);
                let value = args.swap_remove(2);
                Ok(m.set(row, col, value)?)
            })
            .method("printStr", |m, args, host| {
                expect_args("printStr", &args, 0)?;
                let text = m.to_display_string(host);
                Ok(host.make_string(text))
            })
    })
}

/// Names of the members scripts can use on a matrix, sorted.
pub fn member_names() -> Vec<&'static str> {
    members().names()
}

impl ForeignObject for Matrix {
    fn type_name(&self) -> &'static str {
        "matrix"
    }

    fn describe(&self) -> String {
        Matrix::describe(self)
    }

    fn trace(&self, to_trace: &mut Vec<Value>) {
        Matrix::trace(self, to_trace);
    }

    fn get_property(&self, name: &str, host: &mut dyn Host) -> HostResult<Value> {
        members().get(self, name, host)
    }

    fn call_method(&mut self, name: &str, args: Vec<Value>, host: &mut dyn Host) -> HostResult<Value> {
        members().call(self, name, args, host)
    }

    fn add_operator(&self, operand: &Value, host: &mut dyn Host) -> HostResult<Value> {
        let sum = with_operand(operand, host, |rhs, host| self.add(rhs, host))?;
        Ok(sum.into_value(host))
    }

    fn subtract_operator(&self, operand: &Value, host: &mut dyn Host) -> HostResult<Value> {
        let difference = with_operand(operand, host, |rhs, host| self.subtract(rhs, host))?;
        Ok(difference.into_value(host))
    }

    fn multiply_operator(&self, operand: &Value, host: &mut dyn Host) -> HostResult<Value> {
        let product = with_operand(operand, host, |rhs, host| self.multiply(rhs, host))?;
        Ok(product.into_value(host))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtx_host::{ErrorCode, Opcode};
    use mtx_rts::Runtime;

    #[test]
    fn test_into_value_registers() {
        let mut rt = Runtime::new();
        let value = Matrix::row_vector(vec![Value::integer(1)]).into_value(&mut rt);
        assert!(value.as_foreign().is_some());
        assert_eq!(rt.live_objects(), 1);
        assert_eq!(rt.print_string(&value), "1 x 1 matrix");
    }

    #[test]
    fn test_getters() {
        let mut rt = Runtime::new();
        let value = Matrix::column_vector(vec![Value::Nil; 3]).into_value(&mut rt);
        assert_eq!(rt.get_member(&value, "rows").unwrap(), Value::integer(3));
        assert_eq!(rt.get_member(&value, "cols").unwrap(), Value::integer(1));
        assert_eq!(rt.get_member(&value, "size").unwrap(), Value::integer(3));
    }

    #[test]
    fn test_set_rejects_bad_index_type() {
        let mut rt = Runtime::new();
        let value = Matrix::zeros(1, 1, &mut rt).unwrap().into_value(&mut rt);
        let err = rt
            .call_method(&value, "set", vec![Value::string("1"), Value::integer(1), Value::Nil])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Type);
    }

    #[test]
    fn test_operator_on_itself() {
        let mut rt = Runtime::new();
        let value = Matrix::identity(2, &mut rt).unwrap().into_value(&mut rt);
        let product = rt.binary(Opcode::Multiply, &value, &value).unwrap();
        let object = rt.foreign_object(&product).unwrap();
        let object = object.borrow();
        let matrix = object.as_any().downcast_ref::<Matrix>().unwrap();
        assert_eq!(matrix, &Matrix::identity(2, &mut Runtime::new()).unwrap());
    }
}
