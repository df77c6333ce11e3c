use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::domain::entities::employee_balance_adjustment::EmployeeBalanceAdjustment;
use crate::domain::entities::employee_payable_item::EmployeePayableItem;
use crate::domain::entities::employee_payment::{EmployeePayment, EmployeePaymentAllocation};
use crate::domain::entities::ids::{
    DepartmentId, EmployeeBalanceAdjustmentId, EmployeeId, EmployeePayableItemId,
    EmployeePaymentId, EmployeeSalaryComponentId, PayrollRunEmployeeDetailId, PayrollRunId,
    PayslipId, PositionId, SalaryComponentDefinitionId,
};
use crate::domain::entities::organization::{Department, Employee, Position};
use crate::domain::entities::payroll_run::{PayrollRun, PayrollRunEmployeeDetail};
use crate::domain::entities::payslip::Payslip;
use crate::domain::entities::salary_component::{EmployeeSalaryComponent, SalaryComponentDefinition};

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn get(&self, id: DepartmentId) -> Result<Department, ServerError>;
    async fn list(&self) -> Result<Vec<Department>, ServerError>;
    async fn save(&self, department: Department) -> Result<(), ServerError>;
}

#[async_trait]
pub trait PositionRepository: Send + Sync {
    async fn get(&self, id: PositionId) -> Result<Position, ServerError>;
    async fn list(&self) -> Result<Vec<Position>, ServerError>;
    async fn save(&self, position: Position) -> Result<(), ServerError>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn get(&self, id: EmployeeId) -> Result<Employee, ServerError>;
    async fn list(&self) -> Result<Vec<Employee>, ServerError>;
    async fn save(&self, employee: Employee) -> Result<(), ServerError>;
}

#[async_trait]
pub trait SalaryComponentDefinitionRepository: Send + Sync {
    async fn get(&self, id: SalaryComponentDefinitionId) -> Result<SalaryComponentDefinition, ServerError>;
    async fn list(&self) -> Result<Vec<SalaryComponentDefinition>, ServerError>;
    async fn save(&self, definition: SalaryComponentDefinition) -> Result<(), ServerError>;
}

#[async_trait]
pub trait EmployeeSalaryComponentRepository: Send + Sync {
    async fn get(&self, id: EmployeeSalaryComponentId) -> Result<EmployeeSalaryComponent, ServerError>;
    async fn list(&self) -> Result<Vec<EmployeeSalaryComponent>, ServerError>;
    async fn save(&self, assignment: EmployeeSalaryComponent) -> Result<(), ServerError>;
}

#[async_trait]
pub trait PayrollRunRepository: Send + Sync {
    async fn get(&self, id: PayrollRunId) -> Result<PayrollRun, ServerError>;
    async fn list(&self) -> Result<Vec<PayrollRun>, ServerError>;
    async fn save(&self, run: PayrollRun) -> Result<(), ServerError>;
    async fn delete(&self, id: PayrollRunId) -> Result<(), ServerError>;
}

#[async_trait]
pub trait PayrollRunEmployeeDetailRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<PayrollRunEmployeeDetail>, ServerError>;
    async fn save(&self, detail: PayrollRunEmployeeDetail) -> Result<(), ServerError>;
    async fn delete(&self, id: PayrollRunEmployeeDetailId) -> Result<(), ServerError>;
    /// Deletes every detail row for a run — re-confirmation and draft
    /// deletion both cascade this way (§4.8).
    async fn delete_by_run(&self, run_id: PayrollRunId) -> Result<(), ServerError>;
}

#[async_trait]
pub trait EmployeePayableItemRepository: Send + Sync {
    async fn get(&self, id: EmployeePayableItemId) -> Result<EmployeePayableItem, ServerError>;
    async fn list(&self) -> Result<Vec<EmployeePayableItem>, ServerError>;
    async fn save(&self, item: EmployeePayableItem) -> Result<(), ServerError>;
}

#[async_trait]
pub trait EmployeePaymentRepository: Send + Sync {
    async fn get(&self, id: EmployeePaymentId) -> Result<EmployeePayment, ServerError>;
    async fn list(&self) -> Result<Vec<EmployeePayment>, ServerError>;
    async fn save(&self, payment: EmployeePayment) -> Result<(), ServerError>;

    async fn list_allocations(&self) -> Result<Vec<EmployeePaymentAllocation>, ServerError>;
    async fn save_allocation(&self, allocation: EmployeePaymentAllocation) -> Result<(), ServerError>;
}

#[async_trait]
pub trait EmployeeBalanceAdjustmentRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<EmployeeBalanceAdjustment>, ServerError>;
    async fn save(&self, adjustment: EmployeeBalanceAdjustment) -> Result<(), ServerError>;
}

#[async_trait]
pub trait PayslipRepository: Send + Sync {
    async fn get(&self, id: PayslipId) -> Result<Payslip, ServerError>;
    async fn list(&self) -> Result<Vec<Payslip>, ServerError>;
    async fn save(&self, payslip: Payslip) -> Result<(), ServerError>;
}
